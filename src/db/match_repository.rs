use async_trait::async_trait;
use uuid::Uuid;

use crate::models::error::MatchError;
use crate::models::padel_match::{MatchDetail, MatchScore, MatchSummary, NewMatch, PadelMatch};
use crate::scoring::{GamePosition, ScoringOutcome};

/// Storage handle the match service works against.
///
/// Every method is one unit of work: implementations either apply all of it
/// or none of it.
#[async_trait]
pub trait MatchRepository: Send + Sync + std::fmt::Debug {
    /// Insert the match together with set 1 and the opening 0-0 game.
    async fn insert_match(&self, new_match: &NewMatch) -> Result<PadelMatch, MatchError>;

    /// All matches, newest first.
    async fn list_matches(&self) -> Result<Vec<MatchSummary>, MatchError>;

    async fn fetch_match(&self, match_id: Uuid) -> Result<Option<MatchDetail>, MatchError>;

    /// Current counters and the latest point row, `None` if the match does not exist.
    async fn load_score(&self, match_id: Uuid) -> Result<Option<MatchScore>, MatchError>;

    /// Persist a scored point.
    ///
    /// Fails with [`MatchError::Conflict`] when the match version no longer
    /// equals `expected_version`, i.e. someone else wrote in between.
    async fn commit_point(
        &self,
        match_id: Uuid,
        expected_version: i64,
        played: GamePosition,
        outcome: &ScoringOutcome,
    ) -> Result<(), MatchError>;

    /// Drop the latest `point` row and anything logged after it.
    /// Returns `false` when there was no point to remove.
    async fn remove_last_point(&self, match_id: Uuid) -> Result<bool, MatchError>;

    /// Remove the match and all its rows. Missing matches are not an error.
    async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchError>;
}
