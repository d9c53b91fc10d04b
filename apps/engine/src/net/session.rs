//! The per-session message loop.
//!
//! One `NetworkSession` per running game, host or client. Everything
//! funnels through a single `select!` loop: transport events, commands
//! from the embedding application, the heartbeat tick, and the pacing
//! timer that auto-advances presentation phases. Because the loop is
//! single-threaded, handlers never race each other and per-link send
//! order is preserved.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch::{ClientEvent, Dispatcher, Outbound};
use crate::domain::state::{DealerSelectionMethod, Phase, PlayerId};
use crate::net::transport::{PeerId, PeerTransport, TransportEvent};
use crate::protocol::codec;
use crate::protocol::messages::{Envelope, GameMessage, PeerMessage};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);
pub const MISSED_HEARTBEAT_LIMIT: u32 = 3;

/// Delay before a pacing phase advances, so clients can animate.
pub const PACING_DELAY: Duration = Duration::from_secs(2);
/// Interval between first-black-jack selection cards.
pub const SELECTION_DEAL_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct NetConfig {
    pub heartbeat_interval: Duration,
    pub missed_heartbeat_limit: u32,
    pub stale_window: Duration,
    pub pacing_delay: Duration,
    pub selection_deal_interval: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: HEARTBEAT_INTERVAL,
            missed_heartbeat_limit: MISSED_HEARTBEAT_LIMIT,
            stale_window: codec::DEFAULT_STALE_WINDOW,
            pacing_delay: PACING_DELAY,
            selection_deal_interval: SELECTION_DEAL_INTERVAL,
        }
    }
}

/// Auto-advance operations fired by the pacing timer. Exactly one engine
/// operation each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceKind {
    FinishTeamSummary,
    FinishDealing,
    DealSelectionCard,
    ContinueAfterTrick,
    ContinueAfterHand,
}

/// Commands injected into the loop by the embedding application.
#[derive(Debug)]
pub enum SessionCommand {
    /// Ship one envelope to a peer (client requests ride on this).
    Send { to: PeerId, envelope: Envelope },
    /// Force one auto-advance now (host only).
    Advance(AdvanceKind),
    /// Re-broadcast snapshots after a local host-side mutation.
    RefreshSnapshots,
    /// Host removes a player.
    Kick { player_id: PlayerId, reason: String },
    /// Client: a reconnect landed on a fresh link; trust it and resume.
    RebindHost { peer: PeerId },
    Shutdown,
}

/// What the loop reports upward.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Client(ClientEvent),
    LinkOpened { peer: PeerId },
    /// The link is gone: closed, failed, or heartbeat-dead.
    LinkLost { peer: PeerId },
}

/// Cheap clonable handle for talking to a running session loop.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub async fn command(&self, command: SessionCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

struct LinkHealth {
    last_seen: Instant,
}

pub struct NetworkSession<T: PeerTransport> {
    transport: Arc<T>,
    /// Shared with the embedding application, which locks it for local
    /// operations (lobby management, starting the game) and then sends
    /// `RefreshSnapshots`. Never held across an await.
    dispatcher: Arc<Mutex<Dispatcher>>,
    config: NetConfig,
    links: DashMap<PeerId, LinkHealth>,
    transport_events: mpsc::Receiver<TransportEvent>,
    commands: mpsc::Receiver<SessionCommand>,
    events_out: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
    /// At most one scheduled auto-advance; re-armed after each mutation.
    scheduled: Option<(Instant, AdvanceKind)>,
}

impl<T: PeerTransport> NetworkSession<T> {
    /// Wire up a session loop. `transport_events` is the channel the
    /// transport implementation was constructed with.
    pub fn new(
        transport: Arc<T>,
        dispatcher: Arc<Mutex<Dispatcher>>,
        transport_events: mpsc::Receiver<TransportEvent>,
        config: NetConfig,
    ) -> (Self, SessionHandle, mpsc::Receiver<SessionEvent>) {
        let (commands_tx, commands_rx) = mpsc::channel(64);
        let (events_tx, events_rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let handle = SessionHandle {
            commands: commands_tx,
            cancel: cancel.clone(),
        };
        let session = Self {
            transport,
            dispatcher,
            config,
            links: DashMap::new(),
            transport_events,
            commands: commands_rx,
            events_out: events_tx,
            cancel,
            scheduled: None,
        };
        (session, handle, events_rx)
    }

    pub async fn run(mut self) {
        let mut heartbeat = tokio::time::interval_at(
            Instant::now() + self.config.heartbeat_interval,
            self.config.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!("session loop started");

        loop {
            let scheduled_at = self.scheduled.map(|(at, _)| at);
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = heartbeat.tick() => self.heartbeat_sweep().await,
                _ = async {
                    match scheduled_at {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => self.fire_scheduled().await,
                event = self.transport_events.recv() => match event {
                    Some(event) => self.on_transport_event(event).await,
                    None => break,
                },
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.on_command(command).await,
                },
            }
        }
        info!("session loop stopped");
    }

    async fn on_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Data { from, bytes } => {
                let envelope = match codec::decode(&bytes) {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        warn!(peer = %from, error = %err, "undecodable frame dropped");
                        return;
                    }
                };
                if codec::is_stale(&envelope, codec::now_ms(), self.config.stale_window) {
                    debug!(peer = %from, id = %envelope.id, "stale envelope dropped");
                    return;
                }
                self.mark_alive(from);

                let output = self.dispatcher.lock().handle(from, envelope);
                self.send_all(output.outbound).await;
                for event in output.events {
                    let _ = self.events_out.send(SessionEvent::Client(event)).await;
                }
                self.arm_schedule();
            }
            TransportEvent::Opened { peer } => {
                self.links.insert(peer, LinkHealth { last_seen: Instant::now() });
                let _ = self.events_out.send(SessionEvent::LinkOpened { peer }).await;
            }
            TransportEvent::Closed { peer } => self.drop_link(peer).await,
            TransportEvent::Failed { peer, detail } => {
                warn!(peer = %peer, detail, "link failed");
                self.drop_link(peer).await;
            }
        }
    }

    async fn on_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Send { to, envelope } => {
                self.send_one(Outbound { to, envelope }).await;
            }
            SessionCommand::Advance(kind) => {
                let out = self.advance(kind);
                self.send_all(out).await;
                self.arm_schedule();
            }
            SessionCommand::RefreshSnapshots => {
                let out = match &*self.dispatcher.lock() {
                    Dispatcher::Host(host) => host.broadcast_snapshots(),
                    Dispatcher::Client(_) => Vec::new(),
                };
                self.send_all(out).await;
                self.arm_schedule();
            }
            SessionCommand::Kick { player_id, reason } => {
                let out = match &mut *self.dispatcher.lock() {
                    Dispatcher::Host(host) => host.kick(player_id, &reason),
                    Dispatcher::Client(_) => Vec::new(),
                };
                self.send_all(out).await;
            }
            SessionCommand::RebindHost { peer } => {
                let request = match &mut *self.dispatcher.lock() {
                    Dispatcher::Client(client) => {
                        client.bind_host(peer);
                        Some(client.reconnect_request())
                    }
                    Dispatcher::Host(_) => None,
                };
                if let Some(request) = request {
                    self.links.insert(peer, LinkHealth { last_seen: Instant::now() });
                    self.send_one(Outbound { to: peer, envelope: request }).await;
                }
            }
            SessionCommand::Shutdown => unreachable!("handled by the loop"),
        }
    }

    /// Host only: run one scheduled engine operation. A client action may
    /// have advanced the phase since scheduling, in which case the engine
    /// refuses and the tick is simply dropped.
    fn advance(&mut self, kind: AdvanceKind) -> Vec<Outbound> {
        let mut guard = self.dispatcher.lock();
        let Dispatcher::Host(host) = &mut *guard else {
            return Vec::new();
        };
        let result = match kind {
            AdvanceKind::FinishTeamSummary => host.engine_mut().finish_team_summary().map(|()| None),
            AdvanceKind::FinishDealing => host.engine_mut().finish_dealing().map(|()| None),
            AdvanceKind::DealSelectionCard => {
                host.engine_mut().deal_black_jack_card().map(Some)
            }
            AdvanceKind::ContinueAfterTrick => host.engine_mut().continue_after_trick().map(|()| None),
            AdvanceKind::ContinueAfterHand => host.engine_mut().continue_after_hand().map(|()| None),
        };
        match result {
            Ok(Some(reveal)) => host.broadcast_reveal(reveal),
            Ok(None) => host.broadcast_snapshots(),
            Err(err) => {
                debug!(?kind, error = %err, "scheduled advance no longer applicable");
                Vec::new()
            }
        }
    }

    /// Arm the pacing timer for the current phase, replacing whatever was
    /// scheduled before. Phases that wait on player input never schedule.
    fn arm_schedule(&mut self) {
        let guard = self.dispatcher.lock();
        let Dispatcher::Host(host) = &*guard else {
            self.scheduled = None;
            return;
        };
        let state = host.engine().state();
        let pacing = self.config.pacing_delay;
        self.scheduled = match state.phase {
            Phase::TeamSummary => Some((Instant::now() + pacing, AdvanceKind::FinishTeamSummary)),
            Phase::Dealing => Some((Instant::now() + pacing, AdvanceKind::FinishDealing)),
            Phase::TrickComplete => Some((Instant::now() + pacing, AdvanceKind::ContinueAfterTrick)),
            Phase::HandComplete => Some((Instant::now() + pacing, AdvanceKind::ContinueAfterHand)),
            Phase::DealerSelection
                if state.options.dealer_selection == DealerSelectionMethod::FirstBlackJack =>
            {
                Some((
                    Instant::now() + self.config.selection_deal_interval,
                    AdvanceKind::DealSelectionCard,
                ))
            }
            _ => None,
        };
    }

    async fn fire_scheduled(&mut self) {
        if let Some((_, kind)) = self.scheduled.take() {
            let out = self.advance(kind);
            self.send_all(out).await;
            self.arm_schedule();
        }
    }

    /// Ping every link; declare the silent ones dead.
    async fn heartbeat_sweep(&mut self) {
        let deadline = self.config.heartbeat_interval * self.config.missed_heartbeat_limit;
        let dead: Vec<PeerId> = self
            .links
            .iter()
            .filter(|entry| entry.value().last_seen.elapsed() > deadline)
            .map(|entry| *entry.key())
            .collect();
        for peer in dead {
            warn!(peer = %peer, "no heartbeat within limit, dropping link");
            let _ = self.transport.disconnect(peer).await;
            self.drop_link(peer).await;
        }

        let heartbeat = Envelope::new(GameMessage::Peer(PeerMessage::Heartbeat));
        let peers: Vec<PeerId> = self.links.iter().map(|entry| *entry.key()).collect();
        for peer in peers {
            self.send_one(Outbound { to: peer, envelope: heartbeat.clone() }).await;
        }
    }

    async fn drop_link(&mut self, peer: PeerId) {
        if self.links.remove(&peer).is_none() {
            return;
        }
        let output = self.dispatcher.lock().handle_link_closed(peer);
        self.send_all(output.outbound).await;
        let _ = self.events_out.send(SessionEvent::LinkLost { peer }).await;
    }

    fn mark_alive(&self, peer: PeerId) {
        match self.links.get_mut(&peer) {
            Some(mut health) => health.last_seen = Instant::now(),
            None => {
                // Data can outrun the Opened event; treat it as an open.
                self.links.insert(peer, LinkHealth { last_seen: Instant::now() });
            }
        }
    }

    /// Sends preserve submission order per link; a failed send drops the
    /// link on the next sweep rather than tearing it down inline.
    async fn send_all(&self, outbound: Vec<Outbound>) {
        for message in outbound {
            self.send_one(message).await;
        }
    }

    async fn send_one(&self, outbound: Outbound) {
        let bytes = match codec::encode(&outbound.envelope) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "outbound envelope failed to encode");
                return;
            }
        };
        if let Err(err) = self.transport.send(outbound.to, bytes).await {
            warn!(peer = %outbound.to, error = %err, "send failed");
        }
    }
}
