use crate::domain::dealer::is_black_jack;
use crate::domain::engine::GameEngine;
use crate::domain::state::{DealerSelectionMethod, Phase};
use crate::domain::test_fixtures::four_player_state;
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn card_draw_settles_dealer_after_four_draws() {
    let mut engine = GameEngine::resume(four_player_state());
    engine.start_game().unwrap();
    assert_eq!(engine.phase(), Phase::DealerSelection);

    for seat in 0..4u8 {
        let reveal = engine.draw_dealer_card(seat).unwrap();
        assert_eq!(reveal.seat, seat);
        assert_eq!(reveal.selection_complete, seat == 3);
    }

    assert_eq!(engine.phase(), Phase::TeamSummary);
    assert_eq!(engine.state().dealer, 0);
    assert!(engine.state().dealer_selection.is_none());
    // Seats renumbered but still exactly 0..=3.
    let mut seats: Vec<u8> = engine.state().players.iter().map(|p| p.seat).collect();
    seats.sort_unstable();
    assert_eq!(seats, vec![0, 1, 2, 3]);
}

#[test]
fn a_seat_cannot_draw_twice() {
    let mut engine = GameEngine::resume(four_player_state());
    engine.start_game().unwrap();
    engine.draw_dealer_card(2).unwrap();
    let err = engine.draw_dealer_card(2).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::OutOfTurn, _)));
}

#[test]
fn draw_is_rejected_under_the_wrong_method() {
    let mut state = four_player_state();
    state.options.dealer_selection = DealerSelectionMethod::FirstBlackJack;
    let mut engine = GameEngine::resume(state);
    engine.start_game().unwrap();

    let err = engine.draw_dealer_card(0).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongDealerMethod, _)
    ));
}

#[test]
fn first_black_jack_deals_around_until_a_black_jack() {
    let mut state = four_player_state();
    state.options.dealer_selection = DealerSelectionMethod::FirstBlackJack;
    let mut engine = GameEngine::resume(state);
    engine.start_game().unwrap();

    let mut expected_seat = 0u8;
    // A 24-card deck holds both black jacks, so this always terminates.
    for _ in 0..24 {
        let reveal = engine.deal_black_jack_card().unwrap();
        assert_eq!(reveal.seat, expected_seat);
        if reveal.selection_complete {
            assert!(is_black_jack(reveal.card));
            assert_eq!(engine.phase(), Phase::TeamSummary);
            assert_eq!(engine.state().dealer, 0);
            return;
        }
        assert!(!is_black_jack(reveal.card));
        expected_seat = (expected_seat + 1) % 4;
    }
    panic!("no black jack dealt from a full deck");
}

#[test]
fn host_assigned_dealer_skips_selection() {
    let mut state = four_player_state();
    state.options.dealer_selection = DealerSelectionMethod::HostAssigned;
    let chosen = state.players[2].id;
    let mut engine = GameEngine::resume(state);

    engine.set_predetermined_dealer(2).unwrap();
    engine.start_game().unwrap();

    assert_eq!(engine.phase(), Phase::TeamSummary);
    // The chosen player now occupies seat 0.
    assert_eq!(engine.state().player_at(0).unwrap().id, chosen);
}

#[test]
fn host_assigned_without_a_choice_cannot_start() {
    let mut state = four_player_state();
    state.options.dealer_selection = DealerSelectionMethod::HostAssigned;
    let mut engine = GameEngine::resume(state);

    let err = engine.start_game().unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongDealerMethod, _)
    ));
}

#[test]
fn starting_requires_four_connected_players() {
    let mut state = four_player_state();
    state.players[1].connected = false;
    let mut engine = GameEngine::resume(state);
    assert!(engine.start_game().is_err());

    let mut state = four_player_state();
    state.players.pop();
    let mut engine = GameEngine::resume(state);
    assert!(engine.start_game().is_err());
}
