use serde::Serialize;

use crate::scoring::engine::{Tally, POINTS_TO_WIN_GAME, WINNING_MARGIN};

/// Traditional padel call for the current game, one label per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameScoreLabel {
    pub team1: String,
    pub team2: String,
}

impl From<Tally> for GameScoreLabel {
    fn from(points: Tally) -> Self {
        Self {
            team1: point_label(points.team1, points.team2).to_string(),
            team2: point_label(points.team2, points.team1).to_string(),
        }
    }
}

/// Maps a raw point count onto 0/15/30/40/AD.
///
/// Past 40-40 the counts keep growing, so only the difference matters:
/// level is deuce ("40" each), one ahead is advantage. A tally that already
/// won the game, like the final point of a match, reads "GAME".
pub fn point_label(own: i32, other: i32) -> &'static str {
    if own >= POINTS_TO_WIN_GAME && own - other >= WINNING_MARGIN {
        return "GAME";
    }
    if own >= 3 && other >= 3 {
        return if own > other { "AD" } else { "40" };
    }
    match own {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_calls() {
        assert_eq!(point_label(0, 0), "0");
        assert_eq!(point_label(1, 0), "15");
        assert_eq!(point_label(2, 1), "30");
        assert_eq!(point_label(3, 2), "40");
    }

    #[test]
    fn test_deuce_and_advantage() {
        let deuce = GameScoreLabel::from(Tally::new(5, 5));
        assert_eq!(deuce.team1, "40");
        assert_eq!(deuce.team2, "40");

        let advantage = GameScoreLabel::from(Tally::new(4, 5));
        assert_eq!(advantage.team1, "40");
        assert_eq!(advantage.team2, "AD");
    }

    #[test]
    fn test_won_game_is_not_shown_as_forty() {
        assert_eq!(point_label(4, 0), "GAME");
        assert_eq!(point_label(0, 4), "0");

        let after_deuce = GameScoreLabel::from(Tally::new(3, 5));
        assert_eq!(after_deuce.team1, "40");
        assert_eq!(after_deuce.team2, "GAME");
    }
}
