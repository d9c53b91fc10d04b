use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::state::{GameState, Maker, Phase, Seat, TrickState};
use crate::domain::test_fixtures::{c, four_player_state};
use crate::domain::tricks::{legal_moves, play_card, resolve_trick};
use crate::errors::domain::{DomainError, ValidationKind};

/// Rig a mid-play state: explicit hands, trump, and an open trick led by
/// `leader`.
fn playing_state(dealer: Seat, trump: Suit, hands: [Vec<Card>; 4], leader: Seat) -> GameState {
    let mut state = four_player_state();
    state.dealer = dealer;
    state.hand.hands = hands;
    state.hand.trump = Some(trump);
    state.hand.maker = Some(Maker { seat: leader, team: leader % 2, alone: false });
    state.hand.current_trick = Some(TrickState::led_by(leader));
    state.phase = Phase::Playing;
    state.turn = Some(leader);
    state
}

#[test]
fn must_follow_the_led_effective_suit() {
    // Spades trump. Seat 1 holds the left bower (J♣) and a heart; a
    // spade lead must be followed with the left bower, not the heart.
    let hands = [
        vec![c(Suit::Spades, Rank::Ace), c(Suit::Diamonds, Rank::Nine)],
        vec![c(Suit::Clubs, Rank::Jack), c(Suit::Hearts, Rank::King)],
        vec![c(Suit::Spades, Rank::Ten), c(Suit::Clubs, Rank::Nine)],
        vec![c(Suit::Hearts, Rank::Nine), c(Suit::Hearts, Rank::Ten)],
    ];
    let mut state = playing_state(3, Suit::Spades, hands, 0);

    play_card(&mut state, 0, c(Suit::Spades, Rank::Ace)).unwrap();

    assert_eq!(legal_moves(&state, 1), vec![c(Suit::Clubs, Rank::Jack)]);
    let err = play_card(&mut state, 1, c(Suit::Hearts, Rank::King)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MustFollowSuit, _)
    ));
    // Card stayed in hand; turn did not advance.
    assert_eq!(state.hand.hands[1].len(), 2);
    assert_eq!(state.turn, Some(1));
}

#[test]
fn void_seats_may_slough_anything() {
    let hands = [
        vec![c(Suit::Spades, Rank::Ace)],
        vec![c(Suit::Hearts, Rank::King), c(Suit::Diamonds, Rank::Nine)],
        vec![c(Suit::Spades, Rank::Ten)],
        vec![c(Suit::Hearts, Rank::Nine)],
    ];
    let mut state = playing_state(3, Suit::Clubs, hands, 0);
    play_card(&mut state, 0, c(Suit::Spades, Rank::Ace)).unwrap();
    // Seat 1 has no spades; both cards are legal.
    assert_eq!(legal_moves(&state, 1).len(), 2);
}

#[test]
fn reneging_option_disables_suit_enforcement() {
    let hands = [
        vec![c(Suit::Spades, Rank::Ace)],
        vec![c(Suit::Spades, Rank::Nine), c(Suit::Hearts, Rank::King)],
        vec![],
        vec![],
    ];
    let mut state = playing_state(3, Suit::Diamonds, hands, 0);
    state.options.allow_reneging = true;
    play_card(&mut state, 0, c(Suit::Spades, Rank::Ace)).unwrap();
    assert!(play_card(&mut state, 1, c(Suit::Hearts, Rank::King)).is_ok());
}

#[test]
fn completed_trick_pauses_for_pacing() {
    let hands = [
        vec![c(Suit::Hearts, Rank::Ten), c(Suit::Clubs, Rank::Nine)],
        vec![c(Suit::Hearts, Rank::Ace), c(Suit::Clubs, Rank::Ten)],
        vec![c(Suit::Spades, Rank::Nine), c(Suit::Clubs, Rank::Jack)],
        vec![c(Suit::Hearts, Rank::King), c(Suit::Clubs, Rank::Queen)],
    ];
    let mut state = playing_state(3, Suit::Spades, hands, 0);

    play_card(&mut state, 0, c(Suit::Hearts, Rank::Ten)).unwrap();
    play_card(&mut state, 1, c(Suit::Hearts, Rank::Ace)).unwrap();
    play_card(&mut state, 2, c(Suit::Spades, Rank::Nine)).unwrap();
    let result = play_card(&mut state, 3, c(Suit::Hearts, Rank::King)).unwrap();

    // Seat 2 trumped in.
    assert!(result.trick_completed);
    assert_eq!(result.trick_winner, Some(2));
    assert!(!result.hand_completed);
    assert_eq!(state.phase, Phase::TrickComplete);
    assert_eq!(state.turn, None);
    assert_eq!(state.hand.completed_tricks.len(), 1);
}

#[test]
fn alone_trick_completes_with_three_plays() {
    // Seat 0 went alone; partner (seat 2) sits out.
    let hands = [
        vec![c(Suit::Hearts, Rank::Ace)],
        vec![c(Suit::Hearts, Rank::Nine)],
        vec![],
        vec![c(Suit::Hearts, Rank::King)],
    ];
    let mut state = playing_state(3, Suit::Spades, hands, 0);
    state.hand.maker = Some(Maker { seat: 0, team: 0, alone: true });

    play_card(&mut state, 0, c(Suit::Hearts, Rank::Ace)).unwrap();
    play_card(&mut state, 1, c(Suit::Hearts, Rank::Nine)).unwrap();
    let result = play_card(&mut state, 3, c(Suit::Hearts, Rank::King)).unwrap();
    assert!(result.trick_completed);
    assert_eq!(result.trick_winner, Some(0));
}

#[test]
fn playing_out_of_turn_or_unheld_cards_is_rejected() {
    let hands = [
        vec![c(Suit::Hearts, Rank::Ten)],
        vec![c(Suit::Hearts, Rank::Ace)],
        vec![],
        vec![],
    ];
    let mut state = playing_state(3, Suit::Spades, hands, 0);

    let err = play_card(&mut state, 1, c(Suit::Hearts, Rank::Ace)).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::OutOfTurn, _)));

    let err = play_card(&mut state, 0, c(Suit::Clubs, Rank::Ace)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CardNotInHand, _)
    ));
}

#[test]
fn trick_resolution_honors_bowers() {
    let trump = Suit::Hearts;
    // Right bower beats left bower beats trump ace.
    let plays = [
        (0u8, c(Suit::Hearts, Rank::Ace)),
        (1u8, c(Suit::Diamonds, Rank::Jack)),
        (2u8, c(Suit::Hearts, Rank::Jack)),
        (3u8, c(Suit::Hearts, Rank::King)),
    ];
    assert_eq!(resolve_trick(&plays, trump), Some(2));

    // No trump played: highest of the led suit wins, off-suit is dross.
    let plays = [
        (2u8, c(Suit::Clubs, Rank::Ten)),
        (3u8, c(Suit::Diamonds, Rank::Ace)),
        (0u8, c(Suit::Clubs, Rank::King)),
        (1u8, c(Suit::Clubs, Rank::Nine)),
    ];
    assert_eq!(resolve_trick(&plays, trump), Some(0));
}
