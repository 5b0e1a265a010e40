use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::match_repository::MatchRepository;
use crate::models::error::MatchError;
use crate::models::padel_match::{
    MatchDetail, MatchScore, MatchSummary, NewMatch, PadelMatch, PointKind, PointRecord, SetScore,
};
use crate::scoring::{GamePosition, ScoringOutcome};

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order, paired with the match version.
    matches: Vec<(PadelMatch, i64)>,
    games: Vec<SetScore>,
    points: Vec<PointRecord>,
    next_row_id: i64,
}

impl Tables {
    fn row_id(&mut self) -> i64 {
        self.next_row_id += 1;
        self.next_row_id
    }

    fn match_entry(&mut self, match_id: Uuid) -> Option<&mut (PadelMatch, i64)> {
        self.matches.iter_mut().find(|(m, _)| m.id == match_id)
    }

    fn push_point(&mut self, match_id: Uuid, position: GamePosition, team1: i32, team2: i32, kind: PointKind) {
        let id = self.row_id();
        self.points.push(PointRecord {
            id,
            match_id,
            set_number: position.set_number,
            game_number: position.game_number,
            team1_points: team1,
            team2_points: team2,
            kind,
            timestamp: Utc::now(),
        });
    }

    fn push_set(&mut self, match_id: Uuid, set_number: i32) {
        if self.games.iter().any(|s| s.match_id == match_id && s.set_number == set_number) {
            return;
        }
        let id = self.row_id();
        self.games.push(SetScore {
            id,
            match_id,
            set_number,
            team1_games: 0,
            team2_games: 0,
        });
    }

    fn latest_point(&self, match_id: Uuid) -> Option<&PointRecord> {
        self.points.iter().rev().find(|p| p.match_id == match_id)
    }
}

/// Process-local match storage behind a mutex.
///
/// Used by the test-suite and for running the API without Postgres; nothing
/// survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryMatchRepository {
    tables: Mutex<Tables>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn insert_match(&self, new_match: &NewMatch) -> Result<PadelMatch, MatchError> {
        let mut tables = self.tables();
        let padel_match = PadelMatch {
            id: Uuid::new_v4(),
            team1_player1: new_match.team1_player1.clone(),
            team1_player2: new_match.team1_player2.clone(),
            team2_player1: new_match.team2_player1.clone(),
            team2_player2: new_match.team2_player2.clone(),
            team1_sets: 0,
            team2_sets: 0,
            created_at: Utc::now(),
        };

        tables.matches.push((padel_match.clone(), 0));
        tables.push_set(padel_match.id, 1);
        tables.push_point(
            padel_match.id,
            GamePosition { set_number: 1, game_number: 1 },
            0,
            0,
            PointKind::GameStart,
        );
        Ok(padel_match)
    }

    async fn list_matches(&self) -> Result<Vec<MatchSummary>, MatchError> {
        let tables = self.tables();
        let mut summaries: Vec<MatchSummary> = tables
            .matches
            .iter()
            .rev()
            .map(|(padel_match, _)| MatchSummary {
                current_set: tables
                    .games
                    .iter()
                    .filter(|s| s.match_id == padel_match.id)
                    .map(|s| s.set_number)
                    .max(),
                current_game: tables.latest_point(padel_match.id).map(|p| p.game_number),
                padel_match: padel_match.clone(),
            })
            .collect();
        // Stable, so equal timestamps keep newest-inserted first.
        summaries.sort_by(|a, b| b.padel_match.created_at.cmp(&a.padel_match.created_at));
        Ok(summaries)
    }

    async fn fetch_match(&self, match_id: Uuid) -> Result<Option<MatchDetail>, MatchError> {
        let tables = self.tables();
        let Some((padel_match, _)) = tables.matches.iter().find(|(m, _)| m.id == match_id) else {
            return Ok(None);
        };

        let mut games: Vec<SetScore> = tables
            .games
            .iter()
            .filter(|s| s.match_id == match_id)
            .cloned()
            .collect();
        games.sort_by_key(|s| s.set_number);

        let points_history = tables
            .points
            .iter()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect();

        Ok(Some(MatchDetail::new(padel_match.clone(), games, points_history)))
    }

    async fn load_score(&self, match_id: Uuid) -> Result<Option<MatchScore>, MatchError> {
        let tables = self.tables();
        let Some((padel_match, version)) = tables.matches.iter().find(|(m, _)| m.id == match_id) else {
            return Ok(None);
        };

        let latest_point = tables.latest_point(match_id).cloned();
        let set_games = latest_point.as_ref().and_then(|point| {
            tables
                .games
                .iter()
                .find(|s| s.match_id == match_id && s.set_number == point.set_number)
                .map(SetScore::games)
        });

        Ok(Some(MatchScore {
            version: *version,
            sets: padel_match.sets(),
            latest_point,
            set_games,
        }))
    }

    async fn commit_point(
        &self,
        match_id: Uuid,
        expected_version: i64,
        played: GamePosition,
        outcome: &ScoringOutcome,
    ) -> Result<(), MatchError> {
        let mut tables = self.tables();
        let Some((padel_match, version)) = tables.match_entry(match_id) else {
            return Err(MatchError::NotFound("Match not found".to_string()));
        };
        if *version != expected_version {
            return Err(MatchError::Conflict(
                "Match was updated by another request, reload and retry".to_string(),
            ));
        }
        *version += 1;
        padel_match.team1_sets = outcome.sets.team1;
        padel_match.team2_sets = outcome.sets.team2;

        tables.push_point(
            match_id,
            played,
            outcome.points.team1,
            outcome.points.team2,
            PointKind::Point,
        );

        if outcome.game_won.is_some() {
            if let Some(set) = tables
                .games
                .iter_mut()
                .find(|s| s.match_id == match_id && s.set_number == played.set_number)
            {
                set.team1_games = outcome.games.team1;
                set.team2_games = outcome.games.team2;
            }
        }

        if let Some(set_number) = outcome.next_set {
            tables.push_set(match_id, set_number);
        }

        if let Some(next_game) = outcome.next_game {
            tables.push_point(match_id, next_game, 0, 0, PointKind::GameStart);
        }

        Ok(())
    }

    async fn remove_last_point(&self, match_id: Uuid) -> Result<bool, MatchError> {
        let mut tables = self.tables();
        let last_point = tables
            .points
            .iter()
            .rev()
            .find(|p| p.match_id == match_id && p.kind == PointKind::Point)
            .map(|p| p.id);

        let Some(point_id) = last_point else {
            return Ok(false);
        };

        tables.points.retain(|p| p.match_id != match_id || p.id < point_id);
        if let Some((_, version)) = tables.match_entry(match_id) {
            *version += 1;
        }
        Ok(true)
    }

    async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchError> {
        let mut tables = self.tables();
        tables.points.retain(|p| p.match_id != match_id);
        tables.games.retain(|s| s.match_id != match_id);
        tables.matches.retain(|(m, _)| m.id != match_id);
        Ok(())
    }
}
