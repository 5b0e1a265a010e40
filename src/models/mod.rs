pub mod error;
pub mod padel_match;
