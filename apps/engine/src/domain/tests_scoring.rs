use crate::domain::scoring::apply_hand_score;
use crate::domain::state::{GameState, Maker, Phase, Seat, TrickState};
use crate::domain::test_fixtures::four_player_state;

/// Rig a hand that just finished its fifth trick with the given winners.
fn scored_state(maker: Maker, trick_winners: [Seat; 5]) -> GameState {
    let mut state = four_player_state();
    state.phase = Phase::Playing;
    state.hand.maker = Some(maker);
    for winner in trick_winners {
        let mut trick = TrickState::led_by(winner);
        trick.winner = Some(winner);
        state.hand.completed_tricks.push(trick);
    }
    state
}

#[test]
fn three_or_four_tricks_score_one_point() {
    let maker = Maker { seat: 0, team: 0, alone: false };
    let mut state = scored_state(maker, [0, 2, 1, 0, 3]);
    let over = apply_hand_score(&mut state).unwrap();

    assert!(!over);
    assert_eq!(state.scores, [1, 0]);
    assert_eq!(state.phase, Phase::HandComplete);
    let record = state.hand_scores.last().unwrap();
    assert_eq!((record.team, record.points), (0, 1));
    assert_eq!(record.tricks, [3, 2]);
}

#[test]
fn a_march_scores_two() {
    let maker = Maker { seat: 1, team: 1, alone: false };
    let mut state = scored_state(maker, [1, 3, 1, 1, 3]);
    apply_hand_score(&mut state).unwrap();
    assert_eq!(state.scores, [0, 2]);
}

#[test]
fn an_alone_march_scores_four() {
    let maker = Maker { seat: 1, team: 1, alone: true };
    let mut state = scored_state(maker, [1, 1, 1, 1, 1]);
    apply_hand_score(&mut state).unwrap();
    assert_eq!(state.scores, [0, 4]);
}

#[test]
fn a_euchre_hands_the_defenders_two() {
    let maker = Maker { seat: 0, team: 0, alone: false };
    let mut state = scored_state(maker, [0, 1, 3, 1, 0]);
    apply_hand_score(&mut state).unwrap();
    assert_eq!(state.scores, [0, 2]);
    let record = state.hand_scores.last().unwrap();
    assert_eq!(record.team, 1);
}

#[test]
fn reaching_ten_ends_the_game() {
    let maker = Maker { seat: 0, team: 0, alone: false };
    let mut state = scored_state(maker, [0, 0, 0, 0, 0]);
    state.scores = [8, 5];
    let over = apply_hand_score(&mut state).unwrap();

    assert!(over);
    assert_eq!(state.scores, [10, 5]);
    assert_eq!(state.phase, Phase::GameComplete);
}

#[test]
fn scoring_without_a_maker_is_an_invariant_error() {
    let mut state = four_player_state();
    state.phase = Phase::Playing;
    assert!(apply_hand_score(&mut state).is_err());
}
