use crate::dispatch::client::{ClientDispatcher, ClientEvent};
use crate::dispatch::host::{HostDispatcher, Outbound};
use crate::domain::engine::GameEngine;
use crate::domain::state::{
    BidCall, DealerSelectionMethod, GameId, GameOptions, Phase, PlayerId,
};
use crate::errors::ErrorCode;
use crate::net::transport::PeerId;
use crate::protocol::messages::{
    ClientMessage, Envelope, GameMessage, HostMessage, JoinResponse, PeerMessage,
};

fn host_with_lobby() -> HostDispatcher {
    let engine = GameEngine::new_game(GameId::random(), PlayerId::random(), "host", 11).unwrap();
    HostDispatcher::new(engine)
}

fn client_envelope(message: ClientMessage) -> Envelope {
    Envelope::new(GameMessage::Client(message))
}

/// Join one client and return its identity and the host's responses.
fn join(host: &mut HostDispatcher, peer: PeerId, name: &str) -> (PlayerId, Vec<Outbound>) {
    let player_id = PlayerId::random();
    let out = host.handle(
        peer,
        client_envelope(ClientMessage::JoinRequest { player_id, name: name.into() }),
    );
    (player_id, out)
}

/// Three remote joiners plus the host player makes a full table.
fn full_table(host: &mut HostDispatcher) -> Vec<(PeerId, PlayerId)> {
    (1..4)
        .map(|i| {
            let peer = PeerId::random();
            let (player_id, out) = join(host, peer, &format!("p{i}"));
            assert!(!out.is_empty());
            (peer, player_id)
        })
        .collect()
}

/// Drive a freshly joined table to round-1 bidding via local host ops.
fn open_bidding(host: &mut HostDispatcher) {
    let engine = host.engine_mut();
    engine.start_game().unwrap();
    for seat in 0..4u8 {
        engine.draw_dealer_card(seat).unwrap();
    }
    engine.finish_team_summary().unwrap();
    engine.finish_dealing().unwrap();
    assert_eq!(engine.phase(), Phase::BiddingRound1);
}

/// Advance bidding (via local host ops) until the turn sits on a seat
/// with a wire link, then return that link. At most one local pass is
/// needed: only the host's own player has no link.
fn remote_on_turn(host: &mut HostDispatcher, table: &[(PeerId, PlayerId)]) -> PeerId {
    loop {
        let turn = host.engine().state().turn.unwrap();
        let linked = table.iter().find(|(peer, _)| {
            let player = host.player_for_link(*peer).unwrap();
            host.engine().state().seat_of(player) == Some(turn)
        });
        if let Some((peer, _)) = linked {
            return *peer;
        }
        host.engine_mut().place_bid(turn, BidCall::Pass).unwrap();
    }
}

fn first_join_response(out: &[Outbound], to: PeerId) -> JoinResponse {
    out.iter()
        .find(|o| o.to == to)
        .map(|o| match &o.envelope.payload {
            GameMessage::Host(HostMessage::JoinResponse(r)) => r.clone(),
            other => panic!("expected a join response, got {other:?}"),
        })
        .expect("no response addressed to the joiner")
}

#[test]
fn join_is_answered_with_a_personalized_accept() {
    let mut host = host_with_lobby();
    let peer = PeerId::random();
    let (_, out) = join(&mut host, peer, "alice");

    match first_join_response(&out, peer) {
        JoinResponse::Accepted { seat, state } => {
            assert_eq!(seat, 1);
            assert_eq!(state.your_seat, 1);
            assert_eq!(state.players.len(), 2);
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn a_full_game_rejects_joins_with_structure_not_errors() {
    let mut host = host_with_lobby();
    full_table(&mut host);

    let peer = PeerId::random();
    let (_, out) = join(&mut host, peer, "fifth");
    assert_eq!(out.len(), 1);
    match first_join_response(&out, peer) {
        JoinResponse::Rejected { code, .. } => assert_eq!(code, ErrorCode::GameFull),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn host_class_messages_at_the_host_are_refused() {
    let mut host = host_with_lobby();
    let peer = PeerId::random();
    let out = host.handle(
        peer,
        Envelope::new(GameMessage::Host(HostMessage::Kicked { reason: "spoof".into() })),
    );

    assert_eq!(out.len(), 1);
    match &out[0].envelope.payload {
        GameMessage::Peer(PeerMessage::Error { code, .. }) => {
            assert_eq!(*code, ErrorCode::NotHost);
        }
        other => panic!("expected a peer error, got {other:?}"),
    }
}

#[test]
fn requests_from_unbound_links_are_refused() {
    let mut host = host_with_lobby();
    let stranger = PeerId::random();
    let out = host.handle(stranger, client_envelope(ClientMessage::DrawDealerCard));

    assert_eq!(out.len(), 1);
    match &out[0].envelope.payload {
        GameMessage::Peer(PeerMessage::Error { code, .. }) => {
            assert_eq!(*code, ErrorCode::UnknownPlayer);
        }
        other => panic!("expected a peer error, got {other:?}"),
    }
}

#[test]
fn out_of_turn_bids_answer_the_sender_and_mutate_nothing() {
    let mut host = host_with_lobby();
    let table = full_table(&mut host);
    open_bidding(&mut host);

    // Find a bound link whose seat does not hold the turn.
    let turn = host.engine().state().turn.unwrap();
    let (peer, _) = table
        .iter()
        .find(|(peer, _)| {
            let player = host.player_for_link(*peer).unwrap();
            host.engine().state().seat_of(player) != Some(turn)
        })
        .copied()
        .expect("some link is not on turn");

    let out = host.handle(
        peer,
        client_envelope(ClientMessage::PlaceBid { call: BidCall::Pass }),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, peer);
    match &out[0].envelope.payload {
        GameMessage::Peer(PeerMessage::Error { code, .. }) => {
            assert_eq!(*code, ErrorCode::OutOfTurn);
        }
        other => panic!("expected a peer error, got {other:?}"),
    }
    assert!(host.engine().state().hand.bids.is_empty());
}

#[test]
fn dealer_designation_from_a_non_host_is_refused() {
    let mut host = host_with_lobby();
    host.engine_mut()
        .set_options(GameOptions {
            dealer_selection: DealerSelectionMethod::HostAssigned,
            ..GameOptions::default()
        })
        .unwrap();
    let peer = PeerId::random();
    join(&mut host, peer, "alice");

    let out = host.handle(
        peer,
        client_envelope(ClientMessage::SetPredeterminedDealer { seat: 2 }),
    );
    assert_eq!(out.len(), 1);
    match &out[0].envelope.payload {
        GameMessage::Peer(PeerMessage::Error { code, .. }) => {
            assert_eq!(*code, ErrorCode::NotHost);
        }
        other => panic!("expected a peer error, got {other:?}"),
    }
    assert_eq!(host.engine().state().predetermined_dealer, None);
}

#[test]
fn replayed_envelopes_are_dropped() {
    let mut host = host_with_lobby();
    let table = full_table(&mut host);
    open_bidding(&mut host);

    let peer = remote_on_turn(&mut host, &table);
    let bids_before = host.engine().state().hand.bids.len();

    let envelope = client_envelope(ClientMessage::PlaceBid { call: BidCall::Pass });
    let first = host.handle(peer, envelope.clone());
    assert!(!first.is_empty());
    assert_eq!(host.engine().state().hand.bids.len(), bids_before + 1);

    // Same envelope id again: no response, no second bid.
    let second = host.handle(peer, envelope);
    assert!(second.is_empty());
    assert_eq!(host.engine().state().hand.bids.len(), bids_before + 1);
}

#[test]
fn successful_mutations_broadcast_personalized_snapshots() {
    let mut host = host_with_lobby();
    let table = full_table(&mut host);
    open_bidding(&mut host);

    let peer = remote_on_turn(&mut host, &table);
    let out = host.handle(
        peer,
        client_envelope(ClientMessage::PlaceBid { call: BidCall::Pass }),
    );
    // One snapshot per bound link, each redacted for its recipient.
    assert_eq!(out.len(), table.len());
    for outbound in &out {
        let player = host.player_for_link(outbound.to).unwrap();
        let seat = host.engine().state().seat_of(player).unwrap();
        match &outbound.envelope.payload {
            GameMessage::Host(HostMessage::StateSnapshot(state)) => {
                assert_eq!(state.your_seat, seat);
                assert_eq!(state.hand.your_hand.len(), 5);
            }
            other => panic!("expected a snapshot, got {other:?}"),
        }
    }
}

#[test]
fn kicked_players_are_notified_and_unbound() {
    let mut host = host_with_lobby();
    let peer = PeerId::random();
    let (player_id, _) = join(&mut host, peer, "badsport");

    let out = host.kick(player_id, "host removed you");
    assert!(matches!(
        &out[0].envelope.payload,
        GameMessage::Host(HostMessage::Kicked { .. })
    ));
    assert_eq!(out[0].to, peer);
    assert!(host.player_for_link(peer).is_none());

    // The dropped link is a stranger now.
    let after = host.handle(peer, client_envelope(ClientMessage::Leave));
    match &after[0].envelope.payload {
        GameMessage::Peer(PeerMessage::Error { code, .. }) => {
            assert_eq!(*code, ErrorCode::UnknownPlayer);
        }
        other => panic!("expected a peer error, got {other:?}"),
    }
}

#[test]
fn reconnect_rebinds_a_fresh_link_to_the_old_seat() {
    let mut host = host_with_lobby();
    let old_peer = PeerId::random();
    let (player_id, _) = join(&mut host, old_peer, "dropsy");
    host.handle_link_closed(old_peer);
    assert!(!host.engine().state().player(player_id).unwrap().connected);

    let new_peer = PeerId::random();
    let out = host.handle(
        new_peer,
        client_envelope(ClientMessage::Reconnect { player_id }),
    );
    match first_join_response(&out, new_peer) {
        JoinResponse::Accepted { seat, .. } => assert_eq!(seat, 1),
        other => panic!("expected acceptance, got {other:?}"),
    }
    assert!(host.engine().state().player(player_id).unwrap().connected);
    assert_eq!(host.player_for_link(new_peer), Some(player_id));
    assert!(host.player_for_link(old_peer).is_none());
}

#[test]
fn clients_only_trust_their_bound_host() {
    let mut client = ClientDispatcher::new(PlayerId::random());
    let host_peer = PeerId::random();
    let stranger = PeerId::random();
    client.bind_host(host_peer);

    let spoofed = Envelope::new(GameMessage::Host(HostMessage::Kicked { reason: "go".into() }));
    assert!(client.handle(stranger, spoofed).is_empty());
    assert!(client.mirror().is_none());
}

#[test]
fn client_mirror_follows_snapshots_and_kicks() {
    let mut host = host_with_lobby();
    let peer = PeerId::random();
    let player_id = PlayerId::random();

    let mut client = ClientDispatcher::new(player_id);
    client.bind_host(peer);

    // Run the real join response through the client side. The host
    // addresses the joiner from its own link id, which the client sees
    // as the host peer.
    let out = host.handle(peer, client.join_request("mirror"));
    let response = first_join_response(&out, peer);
    let events = client.handle(
        peer,
        Envelope::new(GameMessage::Host(HostMessage::JoinResponse(response))),
    );
    assert_eq!(events, vec![ClientEvent::Joined { seat: 1 }]);
    assert_eq!(client.seat(), Some(1));
    assert_eq!(client.mirror().unwrap().players.len(), 2);

    let events = client.handle(
        peer,
        Envelope::new(GameMessage::Host(HostMessage::Kicked { reason: "bye".into() })),
    );
    assert_eq!(events, vec![ClientEvent::Kicked { reason: "bye".into() }]);
    assert!(client.mirror().is_none());
    assert!(client.seat().is_none());
}
