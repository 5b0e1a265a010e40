//! Padel scoring rules: point → game → set → match.
//!
//! Everything in here is pure. Persisting the consequences of a point is the
//! job of [`crate::services::MatchService`].

pub mod display;
pub mod engine;

pub use display::{point_label, GameScoreLabel};
pub use engine::{apply_point, GamePosition, ScoreState, ScoringError, ScoringOutcome, Tally, Team};
