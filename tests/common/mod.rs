#![allow(dead_code)]

pub mod match_helpers;
pub mod utils;
