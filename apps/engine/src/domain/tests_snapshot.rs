use crate::domain::cards::{Rank, Suit};
use crate::domain::engine::GameEngine;
use crate::domain::snapshot::{public_for, PublicGameState};
use crate::domain::state::{Maker, Phase};
use crate::domain::test_fixtures::{c, four_player_state, strong_hand};

#[test]
fn only_the_viewers_hand_crosses_the_wire() {
    let mut state = four_player_state();
    state.phase = Phase::Playing;
    state.hand.hands = [strong_hand(), strong_hand(), strong_hand(), strong_hand()];
    state.hand.hands[2].remove(0);
    state.hand.trump = Some(Suit::Hearts);
    state.hand.maker = Some(Maker { seat: 0, team: 0, alone: false });
    state.hand.buried = vec![
        c(Suit::Spades, Rank::Nine),
        c(Suit::Spades, Rank::Ten),
        c(Suit::Diamonds, Rank::Jack),
    ];

    let snapshot = public_for(&state, 1);
    assert_eq!(snapshot.your_seat, 1);
    assert_eq!(snapshot.hand.your_hand, state.hand.hands[1]);
    assert_eq!(snapshot.hand.hand_counts, [5, 5, 4, 5]);
    assert_eq!(snapshot.hand.buried_count, 3);
    assert_eq!(snapshot.hand.trump, Some(Suit::Hearts));

    // No field of the projection carries another seat's cards or the
    // buried stock itself.
    let as_json = serde_json::to_string(&snapshot).unwrap();
    let own_count = state.hand.hands[1]
        .iter()
        .filter(|card| as_json.contains(&serde_json::to_string(card).unwrap()))
        .count();
    assert_eq!(own_count, state.hand.hands[1].len());
    for card in &state.hand.buried {
        assert!(!as_json.contains(&serde_json::to_string(card).unwrap()));
    }
}

#[test]
fn snapshots_survive_a_serde_round_trip() {
    let mut state = four_player_state();
    state.phase = Phase::BiddingRound2;
    state.hand.hands = [strong_hand(), strong_hand(), strong_hand(), strong_hand()];
    state.hand.turned_down = Some(Suit::Clubs);

    let snapshot = public_for(&state, 3);
    let bytes = serde_json::to_vec(&snapshot).unwrap();
    let back: PublicGameState = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn dealer_selection_reveals_are_public() {
    let mut engine = GameEngine::resume(four_player_state());
    engine.start_game().unwrap();
    let reveal = engine.draw_dealer_card(0).unwrap();

    let snapshot = engine.snapshot_for(2);
    assert_eq!(snapshot.dealer_reveals, vec![(0, reveal.card)]);
    assert_eq!(snapshot.phase, Phase::DealerSelection);
}

#[test]
fn lobby_snapshots_show_players_and_options() {
    let state = four_player_state();
    let snapshot = public_for(&state, 0);

    assert_eq!(snapshot.players.len(), 4);
    assert!(snapshot.players[0].is_host);
    assert_eq!(snapshot.players[3].team, 1);
    assert_eq!(snapshot.hand.hand_counts, [0, 0, 0, 0]);
    assert_eq!(snapshot.team_names[0], "Team 1");
}
