//! Hand scoring and game-end detection.

use super::rules::{hand_points, WINNING_SCORE};
use super::state::{GameState, HandScore, Phase};
use crate::errors::domain::DomainError;

/// Score the completed hand, transition to `HandComplete` (or
/// `GameComplete`), and report whether the game ended.
pub fn apply_hand_score(state: &mut GameState) -> Result<bool, DomainError> {
    let maker = state
        .hand
        .maker
        .ok_or_else(|| DomainError::validation_other("Invariant violated: scoring with no maker"))?;

    let tricks = state.hand.tricks_won_by_team();
    let (team, points) = hand_points(maker.team, tricks[maker.team as usize], maker.alone);

    state.scores[team as usize] += points;
    state.hand_scores.push(HandScore {
        team,
        points,
        maker,
        tricks,
    });

    let game_over = state.scores.iter().any(|&s| s >= WINNING_SCORE);
    state.phase = if game_over {
        Phase::GameComplete
    } else {
        Phase::HandComplete
    };
    state.turn = None;
    Ok(game_over)
}
