use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::match_repository::MatchRepository;
use crate::models::error::MatchError;
use crate::models::padel_match::{
    MatchDetail, MatchScore, MatchSummary, NewMatch, PadelMatch, PointKind, PointRecord, SetScore,
};
use crate::scoring::{GamePosition, ScoringOutcome, Tally};

const MATCH_COLUMNS: &str = "
    id, team1_player1, team1_player2, team2_player1, team2_player2,
    team1_sets, team2_sets, created_at
";

const POINT_COLUMNS: &str = r#"
    id, match_id, set_number, game_number, team1_points, team2_points, kind, "timestamp"
"#;

/// Postgres-backed match storage
#[derive(Debug, Clone)]
pub struct MatchQueries {
    pool: PgPool,
}

impl MatchQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for MatchQueries {
    async fn insert_match(&self, new_match: &NewMatch) -> Result<PadelMatch, MatchError> {
        let match_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let padel_match = sqlx::query_as::<_, PadelMatch>(&format!(
            r#"
            INSERT INTO matches (id, team1_player1, team1_player2, team2_player1, team2_player2)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .bind(&new_match.team1_player1)
        .bind(&new_match.team1_player2)
        .bind(&new_match.team2_player1)
        .bind(&new_match.team2_player2)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute match insert query: {:?}", e);
            e
        })?;

        sqlx::query(
            "INSERT INTO games (match_id, set_number, team1_games, team2_games) VALUES ($1, 1, 0, 0)",
        )
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO points (match_id, set_number, game_number, team1_points, team2_points, kind)
            VALUES ($1, 1, 1, 0, 0, $2)
            "#,
        )
        .bind(match_id)
        .bind(PointKind::GameStart)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Created match {}", match_id);
        Ok(padel_match)
    }

    async fn list_matches(&self) -> Result<Vec<MatchSummary>, MatchError> {
        let matches = sqlx::query_as::<_, MatchSummary>(
            r#"
            SELECT
                m.id, m.team1_player1, m.team1_player2, m.team2_player1, m.team2_player2,
                m.team1_sets, m.team2_sets, m.created_at,
                (SELECT MAX(g.set_number) FROM games g WHERE g.match_id = m.id) AS current_set,
                (SELECT p.game_number FROM points p WHERE p.match_id = m.id
                 ORDER BY p.id DESC LIMIT 1) AS current_game
            FROM matches m
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    async fn fetch_match(&self, match_id: Uuid) -> Result<Option<MatchDetail>, MatchError> {
        let padel_match = sqlx::query_as::<_, PadelMatch>(&format!(
            "SELECT {} FROM matches WHERE id = $1",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(padel_match) = padel_match else {
            return Ok(None);
        };

        let games = sqlx::query_as::<_, SetScore>(
            r#"
            SELECT id, match_id, set_number, team1_games, team2_games
            FROM games
            WHERE match_id = $1
            ORDER BY set_number
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        let points_history = sqlx::query_as::<_, PointRecord>(&format!(
            "SELECT {} FROM points WHERE match_id = $1 ORDER BY id",
            POINT_COLUMNS
        ))
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(MatchDetail::new(padel_match, games, points_history)))
    }

    async fn load_score(&self, match_id: Uuid) -> Result<Option<MatchScore>, MatchError> {
        let counters = sqlx::query_as::<_, (i64, i32, i32)>(
            "SELECT version, team1_sets, team2_sets FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((version, team1_sets, team2_sets)) = counters else {
            return Ok(None);
        };

        let latest_point = sqlx::query_as::<_, PointRecord>(&format!(
            "SELECT {} FROM points WHERE match_id = $1 ORDER BY id DESC LIMIT 1",
            POINT_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        let set_games = match &latest_point {
            Some(point) => sqlx::query_as::<_, (i32, i32)>(
                "SELECT team1_games, team2_games FROM games WHERE match_id = $1 AND set_number = $2",
            )
            .bind(match_id)
            .bind(point.set_number)
            .fetch_optional(&self.pool)
            .await?
            .map(|(team1, team2)| Tally::new(team1, team2)),
            None => None,
        };

        Ok(Some(MatchScore {
            version,
            sets: Tally::new(team1_sets, team2_sets),
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
        let mut tx = self.pool.begin().await?;

        // Check-and-set on the version serializes writers on the same match.
        let updated = sqlx::query(
            r#"
            UPDATE matches
            SET version = version + 1, team1_sets = $3, team2_sets = $4
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(match_id)
        .bind(expected_version)
        .bind(outcome.sets.team1)
        .bind(outcome.sets.team2)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(MatchError::Conflict(
                "Match was updated by another request, reload and retry".to_string(),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO points (match_id, set_number, game_number, team1_points, team2_points, kind)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(match_id)
        .bind(played.set_number)
        .bind(played.game_number)
        .bind(outcome.points.team1)
        .bind(outcome.points.team2)
        .bind(PointKind::Point)
        .execute(&mut *tx)
        .await?;

        if outcome.game_won.is_some() {
            sqlx::query(
                r#"
                UPDATE games
                SET team1_games = $3, team2_games = $4
                WHERE match_id = $1 AND set_number = $2
                "#,
            )
            .bind(match_id)
            .bind(played.set_number)
            .bind(outcome.games.team1)
            .bind(outcome.games.team2)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(set_number) = outcome.next_set {
            sqlx::query(
                r#"
                INSERT INTO games (match_id, set_number, team1_games, team2_games)
                VALUES ($1, $2, 0, 0)
                ON CONFLICT (match_id, set_number) DO NOTHING
                "#,
            )
            .bind(match_id)
            .bind(set_number)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(next_game) = outcome.next_game {
            sqlx::query(
                r#"
                INSERT INTO points (match_id, set_number, game_number, team1_points, team2_points, kind)
                VALUES ($1, $2, $3, 0, 0, $4)
                "#,
            )
            .bind(match_id)
            .bind(next_game.set_number)
            .bind(next_game.game_number)
            .bind(PointKind::GameStart)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Committed point for match {} at version {}", match_id, expected_version + 1);
        Ok(())
    }

    async fn remove_last_point(&self, match_id: Uuid) -> Result<bool, MatchError> {
        let mut tx = self.pool.begin().await?;

        // Takes the row lock so a concurrent point waits for the undo.
        sqlx::query("UPDATE matches SET version = version + 1 WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        let last_point = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM points
            WHERE match_id = $1 AND kind = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(match_id)
        .bind(PointKind::Point)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(point_id) = last_point else {
            return Ok(false);
        };

        let removed = sqlx::query("DELETE FROM points WHERE match_id = $1 AND id >= $2")
            .bind(match_id)
            .bind(point_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Undid last point of match {} ({} rows removed)", match_id, removed.rows_affected());
        Ok(true)
    }

    async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM points WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM games WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Deleted match {}", match_id);
        Ok(())
    }
}
