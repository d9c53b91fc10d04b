use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::engine::GameEngine;
use crate::domain::farmers::{decline, eligible_seats, swap};
use crate::domain::state::{GameState, Phase};
use crate::domain::test_fixtures::{c, four_player_state, strong_hand};
use crate::errors::domain::{DomainError, ValidationKind};

fn farmers_cards() -> Vec<Card> {
    vec![
        c(Suit::Clubs, Rank::Nine),
        c(Suit::Clubs, Rank::Ten),
        c(Suit::Diamonds, Rank::Nine),
        c(Suit::Diamonds, Rank::Ten),
        c(Suit::Hearts, Rank::Nine),
    ]
}

fn buried_cards() -> Vec<Card> {
    vec![
        c(Suit::Spades, Rank::Ace),
        c(Suit::Spades, Rank::King),
        c(Suit::Hearts, Rank::Queen),
    ]
}

/// Dealt state with farmer's hands at the given seats, dealer at 3.
fn dealt_state(farmer_seats: &[u8]) -> GameState {
    let mut state = four_player_state();
    state.options.farmers_hand = true;
    state.dealer = 3;
    state.phase = Phase::Dealing;
    for seat in 0..4u8 {
        state.hand.hands[seat as usize] = if farmer_seats.contains(&seat) {
            farmers_cards()
        } else {
            strong_hand()
        };
    }
    state.hand.upcard = Some(c(Suit::Hearts, Rank::Ten));
    state.hand.buried = buried_cards();
    state
}

#[test]
fn eligibility_runs_left_of_the_dealer() {
    let state = dealt_state(&[3, 1]);
    // Dealer is 3, so decision order is 0, 1, 2, 3.
    assert_eq!(eligible_seats(&state), vec![1, 3]);
    assert!(eligible_seats(&dealt_state(&[])).is_empty());
}

#[test]
fn swap_exchanges_three_cards_with_the_buried_stock() {
    let mut state = dealt_state(&[1]);
    state.hand.farmers_pending = vec![1];
    state.phase = Phase::FarmersHandSwap { seat: 1 };

    let traded = [
        c(Suit::Clubs, Rank::Nine),
        c(Suit::Diamonds, Rank::Nine),
        c(Suit::Hearts, Rank::Nine),
    ];
    swap(&mut state, 1, traded).unwrap();

    let hand = &state.hand.hands[1];
    assert_eq!(hand.len(), 5);
    for card in buried_cards() {
        assert!(hand.contains(&card));
    }
    // The nines now sit in the stock.
    let mut buried = state.hand.buried.clone();
    buried.sort();
    let mut expected = traded.to_vec();
    expected.sort();
    assert_eq!(buried, expected);

    // Last pending decision: bidding opens left of the dealer.
    assert_eq!(state.phase, Phase::BiddingRound1);
    assert_eq!(state.turn, Some(0));
}

#[test]
fn swap_rejects_duplicates_and_unheld_cards() {
    let mut state = dealt_state(&[1]);
    state.hand.farmers_pending = vec![1];
    state.phase = Phase::FarmersHandSwap { seat: 1 };

    let dup = c(Suit::Clubs, Rank::Nine);
    let err = swap(&mut state, 1, [dup, dup, c(Suit::Hearts, Rank::Nine)]).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidSwap, _)));

    let err = swap(
        &mut state,
        1,
        [
            c(Suit::Clubs, Rank::Nine),
            c(Suit::Diamonds, Rank::Nine),
            c(Suit::Spades, Rank::Ace), // buried, not held
        ],
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidSwap, _)));
}

#[test]
fn only_the_deciding_seat_may_act() {
    let mut state = dealt_state(&[1, 2]);
    state.hand.farmers_pending = vec![1, 2];
    state.phase = Phase::FarmersHandSwap { seat: 1 };

    let err = decline(&mut state, 2).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::OutOfTurn, _)));
}

#[test]
fn declines_walk_the_pending_queue_then_open_bidding() {
    let mut state = dealt_state(&[0, 2]);
    state.hand.farmers_pending = vec![0, 2];
    state.phase = Phase::FarmersHandSwap { seat: 0 };

    decline(&mut state, 0).unwrap();
    assert_eq!(state.phase, Phase::FarmersHandSwap { seat: 2 });
    decline(&mut state, 2).unwrap();
    assert_eq!(state.phase, Phase::BiddingRound1);
    assert_eq!(state.turn, Some(0));
}

#[test]
fn finish_dealing_routes_through_the_farmers_check() {
    // Option on and a farmer dealt: the swap decision interposes.
    let mut engine = GameEngine::resume(dealt_state(&[2]));
    engine.finish_dealing().unwrap();
    assert_eq!(engine.phase(), Phase::FarmersHandSwap { seat: 2 });
    assert_eq!(engine.state().hand.farmers_pending, vec![2]);

    // Option off: straight to bidding even with an all-9s-and-10s hand.
    let mut state = dealt_state(&[2]);
    state.options.farmers_hand = false;
    let mut engine = GameEngine::resume(state);
    engine.finish_dealing().unwrap();
    assert_eq!(engine.phase(), Phase::BiddingRound1);
}
