use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::db::MatchRepository;
use crate::models::error::MatchError;
use crate::models::padel_match::{CreateMatchRequest, MatchDetail, MatchSummary, NewMatch, PadelMatch};
use crate::scoring::{apply_point, ScoreState, ScoringOutcome, Team};

/// Match bookkeeping on top of the scoring engine
#[derive(Debug, Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository>,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_match(&self, request: CreateMatchRequest) -> Result<PadelMatch, MatchError> {
        let new_match = NewMatch::try_from(request)?;
        let padel_match = self.repository.insert_match(&new_match).await?;
        info!(
            "Match {} created: {}/{} vs {}/{}",
            padel_match.id,
            padel_match.team1_player1,
            padel_match.team1_player2,
            padel_match.team2_player1,
            padel_match.team2_player2
        );
        Ok(padel_match)
    }

    pub async fn list_matches(&self) -> Result<Vec<MatchSummary>, MatchError> {
        self.repository.list_matches().await
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<MatchDetail, MatchError> {
        self.repository
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| MatchError::NotFound("Match not found".to_string()))
    }

    /// Score a point for `team` (1 or 2) and persist every rollover it causes.
    pub async fn record_point(&self, match_id: Uuid, team: Option<i64>) -> Result<ScoringOutcome, MatchError> {
        let team = team
            .ok_or_else(|| "Invalid team specified".to_string())
            .and_then(|value: i64| Team::try_from(value))
            .map_err(MatchError::Validation)?;

        let score = self
            .repository
            .load_score(match_id)
            .await?
            .ok_or_else(|| MatchError::NotFound("Match not found".to_string()))?;
        let latest = score
            .latest_point
            .ok_or_else(|| MatchError::NotFound("No game found".to_string()))?;
        let games = score
            .set_games
            .ok_or_else(|| MatchError::NotFound(format!("Set {} not found", latest.set_number)))?;

        let state = ScoreState {
            position: latest.position(),
            points: latest.points(),
            games,
            sets: score.sets,
        };
        let outcome = apply_point(&state, team).map_err(|e| {
            warn!("Point rejected for match {}: {}", match_id, e);
            MatchError::from(e)
        })?;

        self.repository
            .commit_point(match_id, score.version, state.position, &outcome)
            .await?;

        if let Some(winner) = outcome.match_won {
            info!("Match {} won by team {}", match_id, winner.number());
        } else if let Some(winner) = outcome.set_won {
            info!("Set {} of match {} won by team {}", state.position.set_number, match_id, winner.number());
        }

        Ok(outcome)
    }

    /// Take back the latest point.
    ///
    /// Only the point log is rewound; games, sets and the match result keep
    /// whatever that point changed.
    pub async fn undo_last_point(&self, match_id: Uuid) -> Result<(), MatchError> {
        if !self.repository.remove_last_point(match_id).await? {
            return Err(MatchError::Validation("No points to undo".to_string()));
        }
        info!("Last point of match {} undone", match_id);
        Ok(())
    }

    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchError> {
        self.repository.delete_match(match_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryMatchRepository;
    use crate::models::padel_match::PointKind;
    use crate::scoring::Tally;

    fn service() -> MatchService {
        MatchService::new(Arc::new(InMemoryMatchRepository::new()))
    }

    fn players() -> CreateMatchRequest {
        CreateMatchRequest {
            team1_player1: Some("Ana".into()),
            team1_player2: Some("Bea".into()),
            team2_player1: Some("Carla".into()),
            team2_player2: Some("Dani".into()),
        }
    }

    async fn points(service: &MatchService, match_id: Uuid, team: i64, count: usize) -> ScoringOutcome {
        let mut last = None;
        for _ in 0..count {
            last = Some(service.record_point(match_id, Some(team)).await.unwrap());
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_new_match_starts_at_love() {
        let service = service();
        let created = service.create_match(players()).await.unwrap();
        let detail = service.get_match(created.id).await.unwrap();

        assert_eq!(detail.games.len(), 1);
        assert_eq!(detail.games[0].set_number, 1);
        let current = detail.current_points.unwrap();
        assert_eq!((current.set_number, current.game_number), (1, 1));
        assert_eq!(current.points(), Tally::new(0, 0));
        assert_eq!(current.kind, PointKind::GameStart);
    }

    #[tokio::test]
    async fn test_love_game_rolls_over() {
        let service = service();
        let created = service.create_match(players()).await.unwrap();

        let outcome = points(&service, created.id, 1, 4).await;
        assert_eq!(outcome.game_won, Some(Team::One));

        let detail = service.get_match(created.id).await.unwrap();
        assert_eq!(detail.games[0].games(), Tally::new(1, 0));
        let current = detail.current_points.unwrap();
        assert_eq!(current.game_number, 2);
        assert_eq!(current.points(), Tally::new(0, 0));
    }

    #[tokio::test]
    async fn test_invalid_team_and_unknown_match() {
        let service = service();
        let created = service.create_match(players()).await.unwrap();

        assert!(matches!(
            service.record_point(created.id, Some(3)).await,
            Err(MatchError::Validation(_))
        ));
        assert!(matches!(
            service.record_point(created.id, None).await,
            Err(MatchError::Validation(_))
        ));
        assert!(matches!(
            service.record_point(Uuid::new_v4(), Some(1)).await,
            Err(MatchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_decided_match_is_terminal() {
        let service = service();
        let created = service.create_match(players()).await.unwrap();

        let outcome = points(&service, created.id, 2, 48).await;
        assert_eq!(outcome.match_won, Some(Team::Two));

        let before = service.get_match(created.id).await.unwrap();
        assert!(matches!(
            service.record_point(created.id, Some(1)).await,
            Err(MatchError::Conflict(_))
        ));
        let after = service.get_match(created.id).await.unwrap();
        assert_eq!(before.points_history.len(), after.points_history.len());
        assert_eq!(after.winner, Some(Team::Two));
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let service = MatchService::new(repository.clone());
        let created = service.create_match(players()).await.unwrap();

        let stale = repository.load_score(created.id).await.unwrap().unwrap();
        service.record_point(created.id, Some(1)).await.unwrap();

        let latest = stale.latest_point.unwrap();
        let state = ScoreState {
            position: latest.position(),
            points: latest.points(),
            games: stale.set_games.unwrap(),
            sets: stale.sets,
        };
        let outcome = apply_point(&state, Team::Two).unwrap();
        let result = repository
            .commit_point(created.id, stale.version, state.position, &outcome)
            .await;
        assert!(matches!(result, Err(MatchError::Conflict(_))));
    }
}
