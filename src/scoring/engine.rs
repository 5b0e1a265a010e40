use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points needed to take a game (with a two point lead).
pub const POINTS_TO_WIN_GAME: i32 = 4;
/// Games needed to take a set (with a two game lead). No tie-break at 6-6.
pub const GAMES_TO_WIN_SET: i32 = 6;
/// Lead required for both games and sets.
pub const WINNING_MARGIN: i32 = 2;
/// Best of three.
pub const SETS_TO_WIN_MATCH: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        team.number()
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Team::try_from(value as i64)
    }
}

impl TryFrom<i64> for Team {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("Invalid team specified: {}. Use 1 or 2.", other)),
        }
    }
}

/// A pair of counters, one per team. Used for points, games and sets alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub team1: i32,
    pub team2: i32,
}

impl Tally {
    pub fn new(team1: i32, team2: i32) -> Self {
        Self { team1, team2 }
    }

    pub fn get(&self, team: Team) -> i32 {
        match team {
            Team::One => self.team1,
            Team::Two => self.team2,
        }
    }

    pub fn incremented(self, team: Team) -> Self {
        match team {
            Team::One => Self { team1: self.team1 + 1, ..self },
            Team::Two => Self { team2: self.team2 + 1, ..self },
        }
    }

    /// The team that has reached `threshold` while leading by at least `margin`.
    pub fn leader(&self, threshold: i32, margin: i32) -> Option<Team> {
        [Team::One, Team::Two].into_iter().find(|&team| {
            let own = self.get(team);
            own >= threshold && own - self.get(team.opponent()) >= margin
        })
    }

    /// Winner of a set tally in a best-of-three match, if any.
    pub fn match_winner(&self) -> Option<Team> {
        self.leader(SETS_TO_WIN_MATCH, 1)
    }
}

/// Where a game lives within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePosition {
    pub set_number: i32,
    pub game_number: i32,
}

/// Everything the engine needs to score one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub position: GamePosition,
    /// Points in the current game.
    pub points: Tally,
    /// Games in the set `position.set_number`.
    pub games: Tally,
    /// Sets in the match.
    pub sets: Tally,
}

impl ScoreState {
    /// State of a freshly created match.
    pub fn opening() -> Self {
        Self {
            position: GamePosition { set_number: 1, game_number: 1 },
            points: Tally::default(),
            games: Tally::default(),
            sets: Tally::default(),
        }
    }

    pub fn is_decided(&self) -> bool {
        self.sets.match_winner().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringOutcome {
    /// Tally of the game the point was played in, after the point.
    pub points: Tally,
    pub games: Tally,
    pub sets: Tally,
    pub game_won: Option<Team>,
    pub set_won: Option<Team>,
    pub match_won: Option<Team>,
    /// Number of the set to open, when a set ended and the match goes on.
    pub next_set: Option<i32>,
    /// Fresh 0-0 game to open, when a game ended and the match goes on.
    pub next_game: Option<GamePosition>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Match already won by team {}", .0.number())]
    MatchDecided(Team),
}

/// Scores one point for `team` and works out every rollover it causes.
///
/// Game, set and match are evaluated in that order, each one only when the
/// level below it has just been won.
pub fn apply_point(state: &ScoreState, team: Team) -> Result<ScoringOutcome, ScoringError> {
    if let Some(winner) = state.sets.match_winner() {
        return Err(ScoringError::MatchDecided(winner));
    }

    let points = state.points.incremented(team);
    let mut outcome = ScoringOutcome {
        points,
        games: state.games,
        sets: state.sets,
        game_won: None,
        set_won: None,
        match_won: None,
        next_set: None,
        next_game: None,
    };

    let Some(game_winner) = points.leader(POINTS_TO_WIN_GAME, WINNING_MARGIN) else {
        return Ok(outcome);
    };
    outcome.game_won = Some(game_winner);
    outcome.games = state.games.incremented(game_winner);

    let Some(set_winner) = outcome.games.leader(GAMES_TO_WIN_SET, WINNING_MARGIN) else {
        outcome.next_game = Some(GamePosition {
            set_number: state.position.set_number,
            game_number: state.position.game_number + 1,
        });
        return Ok(outcome);
    };
    outcome.set_won = Some(set_winner);
    outcome.sets = state.sets.incremented(set_winner);

    if outcome.sets.get(set_winner) >= SETS_TO_WIN_MATCH {
        outcome.match_won = Some(set_winner);
        return Ok(outcome);
    }

    // Game numbering restarts with every set.
    let next_set = state.position.set_number + 1;
    outcome.next_set = Some(next_set);
    outcome.next_game = Some(GamePosition { set_number: next_set, game_number: 1 });
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(points: (i32, i32), games: (i32, i32), sets: (i32, i32)) -> ScoreState {
        ScoreState {
            position: GamePosition { set_number: sets.0 + sets.1 + 1, game_number: games.0 + games.1 + 1 },
            points: Tally::new(points.0, points.1),
            games: Tally::new(games.0, games.1),
            sets: Tally::new(sets.0, sets.1),
        }
    }

    /// Feeds points through the engine the way the store would.
    fn play(mut current: ScoreState, winners: &[Team]) -> (ScoreState, Option<ScoringOutcome>) {
        let mut last = None;
        for &team in winners {
            let outcome = apply_point(&current, team).unwrap();
            current = match outcome.next_game {
                Some(position) => ScoreState {
                    position,
                    points: Tally::default(),
                    games: if outcome.next_set.is_some() { Tally::default() } else { outcome.games },
                    sets: outcome.sets,
                },
                None => ScoreState {
                    points: outcome.points,
                    games: outcome.games,
                    sets: outcome.sets,
                    ..current
                },
            };
            last = Some(outcome);
        }
        (current, last)
    }

    #[test]
    fn test_points_accumulate_without_winning() {
        let (current, last) = play(ScoreState::opening(), &[Team::One; 3]);
        assert_eq!(current.points, Tally::new(3, 0));
        let last = last.unwrap();
        assert_eq!(last.game_won, None);
        assert_eq!(last.next_game, None);
    }

    #[test]
    fn test_fourth_point_wins_love_game() {
        let outcome = apply_point(&state((3, 0), (0, 0), (0, 0)), Team::One).unwrap();
        assert_eq!(outcome.points, Tally::new(4, 0));
        assert_eq!(outcome.game_won, Some(Team::One));
        assert_eq!(outcome.games, Tally::new(1, 0));
        assert_eq!(outcome.set_won, None);
        assert_eq!(outcome.next_game, Some(GamePosition { set_number: 1, game_number: 2 }));
    }

    #[test]
    fn test_deuce_requires_two_point_lead() {
        let advantage = apply_point(&state((3, 3), (0, 0), (0, 0)), Team::Two).unwrap();
        assert_eq!(advantage.points, Tally::new(3, 4));
        assert_eq!(advantage.game_won, None);

        let back_to_deuce = apply_point(&state((3, 4), (0, 0), (0, 0)), Team::One).unwrap();
        assert_eq!(back_to_deuce.points, Tally::new(4, 4));
        assert_eq!(back_to_deuce.game_won, None);

        let won = apply_point(&state((5, 4), (0, 0), (0, 0)), Team::One).unwrap();
        assert_eq!(won.game_won, Some(Team::One));
    }

    #[test]
    fn test_set_needs_six_games_and_two_game_lead() {
        let at_five_all = apply_point(&state((3, 0), (5, 5), (0, 0)), Team::One).unwrap();
        assert_eq!(at_five_all.games, Tally::new(6, 5));
        assert_eq!(at_five_all.set_won, None);

        let at_six_all = apply_point(&state((0, 3), (6, 5), (0, 0)), Team::Two).unwrap();
        assert_eq!(at_six_all.games, Tally::new(6, 6));
        assert_eq!(at_six_all.set_won, None);

        let seven_five = apply_point(&state((3, 0), (6, 5), (0, 0)), Team::One).unwrap();
        assert_eq!(seven_five.set_won, Some(Team::One));
        assert_eq!(seven_five.sets, Tally::new(1, 0));
    }

    #[test]
    fn test_set_win_opens_next_set_with_first_game() {
        let outcome = apply_point(&state((3, 1), (5, 2), (0, 0)), Team::One).unwrap();
        assert_eq!(outcome.set_won, Some(Team::One));
        assert_eq!(outcome.match_won, None);
        assert_eq!(outcome.next_set, Some(2));
        assert_eq!(outcome.next_game, Some(GamePosition { set_number: 2, game_number: 1 }));
    }

    #[test]
    fn test_second_set_decides_match_without_new_rows() {
        let outcome = apply_point(&state((0, 3), (4, 5), (1, 1)), Team::Two).unwrap();
        assert_eq!(outcome.set_won, Some(Team::Two));
        assert_eq!(outcome.match_won, Some(Team::Two));
        assert_eq!(outcome.sets, Tally::new(1, 2));
        assert_eq!(outcome.next_set, None);
        assert_eq!(outcome.next_game, None);
    }

    #[test]
    fn test_decided_match_rejects_points() {
        let result = apply_point(&state((0, 0), (0, 0), (2, 0)), Team::Two);
        assert_eq!(result, Err(ScoringError::MatchDecided(Team::One)));
    }

    #[test]
    fn test_straight_sets_match() {
        // 2 sets * 6 games * 4 points
        let winners = vec![Team::One; 48];
        let (current, last) = play(ScoreState::opening(), &winners);
        let last = last.unwrap();
        assert_eq!(last.match_won, Some(Team::One));
        assert_eq!(current.sets, Tally::new(2, 0));
        assert!(current.is_decided());
    }

    #[test]
    fn test_team_conversion() {
        assert_eq!(Team::try_from(1i64), Ok(Team::One));
        assert_eq!(Team::try_from(2i64), Ok(Team::Two));
        assert!(Team::try_from(3i64).is_err());
        assert!(Team::try_from(0i64).is_err());
        assert_eq!(serde_json::to_value(Team::Two).unwrap(), serde_json::json!(2));
    }
}
