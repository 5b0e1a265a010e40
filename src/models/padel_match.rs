use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::error::MatchError;
use crate::scoring::{GamePosition, GameScoreLabel, ScoringOutcome, Tally, Team};

/// A padel match between two teams of two players
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PadelMatch {
    pub id: Uuid,
    pub team1_player1: String,
    pub team1_player2: String,
    pub team2_player1: String,
    pub team2_player2: String,
    pub team1_sets: i32,
    pub team2_sets: i32,
    pub created_at: DateTime<Utc>,
}

impl PadelMatch {
    pub fn sets(&self) -> Tally {
        Tally::new(self.team1_sets, self.team2_sets)
    }

    pub fn winner(&self) -> Option<Team> {
        self.sets().match_winner()
    }
}

/// Games tally of one set. Stored in the `games` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SetScore {
    pub id: i64,
    pub match_id: Uuid,
    pub set_number: i32,
    pub team1_games: i32,
    pub team2_games: i32,
}

impl SetScore {
    pub fn games(&self) -> Tally {
        Tally::new(self.team1_games, self.team2_games)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// 0-0 row opening a game
    GameStart,
    /// Snapshot after a point was won
    Point,
}

/// One row of the point log: the game tally right after an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PointRecord {
    pub id: i64,
    pub match_id: Uuid,
    pub set_number: i32,
    pub game_number: i32,
    pub team1_points: i32,
    pub team2_points: i32,
    pub kind: PointKind,
    pub timestamp: DateTime<Utc>,
}

impl PointRecord {
    pub fn points(&self) -> Tally {
        Tally::new(self.team1_points, self.team2_points)
    }

    pub fn position(&self) -> GamePosition {
        GamePosition {
            set_number: self.set_number,
            game_number: self.game_number,
        }
    }
}

/// Request to create a new match. Fields are optional so a missing name
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateMatchRequest {
    pub team1_player1: Option<String>,
    pub team1_player2: Option<String>,
    pub team2_player1: Option<String>,
    pub team2_player2: Option<String>,
}

/// Validated player line-up.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub team1_player1: String,
    pub team1_player2: String,
    pub team2_player1: String,
    pub team2_player2: String,
}

impl TryFrom<CreateMatchRequest> for NewMatch {
    type Error = MatchError;

    fn try_from(request: CreateMatchRequest) -> Result<Self, Self::Error> {
        fn required(value: Option<String>, field: &str) -> Result<String, MatchError> {
            match value.map(|name| name.trim().to_string()) {
                Some(name) if !name.is_empty() => Ok(name),
                _ => Err(MatchError::Validation(format!("Missing required field: {}", field))),
            }
        }

        Ok(Self {
            team1_player1: required(request.team1_player1, "team1_player1")?,
            team1_player2: required(request.team1_player2, "team1_player2")?,
            team2_player1: required(request.team2_player1, "team2_player1")?,
            team2_player2: required(request.team2_player2, "team2_player2")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointRequest {
    pub team: Option<i64>,
}

/// Match row plus where play currently stands
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct MatchSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub padel_match: PadelMatch,
    pub current_set: Option<i32>,
    pub current_game: Option<i32>,
}

/// Everything the scoreboard needs for one match
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub padel_match: PadelMatch,
    pub games: Vec<SetScore>,
    pub current_points: Option<PointRecord>,
    pub current_score: Option<GameScoreLabel>,
    pub winner: Option<Team>,
    pub points_history: Vec<PointRecord>,
}

impl MatchDetail {
    pub fn new(padel_match: PadelMatch, games: Vec<SetScore>, points_history: Vec<PointRecord>) -> Self {
        let current_points = points_history.last().cloned();
        Self {
            current_score: current_points.as_ref().map(|record| record.points().into()),
            winner: padel_match.winner(),
            padel_match,
            games,
            current_points,
            points_history,
        }
    }
}

/// What the repository hands back when a point is about to be scored
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub version: i64,
    pub sets: Tally,
    pub latest_point: Option<PointRecord>,
    /// Games tally of the set `latest_point` belongs to
    pub set_games: Option<Tally>,
}

#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub success: bool,
    pub outcome: ScoringOutcome,
}
