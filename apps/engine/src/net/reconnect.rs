//! Client-side reconnection policy.
//!
//! When the host link drops in a resumable phase, one polling loop runs:
//! bounded per-attempt timeout, cooldown between attempts, cancellable
//! at every await point. The in-flight guard makes a second concurrent
//! loop impossible, so flapping links cannot stack attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::state::Phase;
use crate::net::transport::{PeerId, PeerTransport};

#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Wait between failed attempts.
    pub cooldown: Duration,
    /// Cap on a single connect attempt.
    pub attempt_timeout: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(3),
            attempt_timeout: Duration::from_secs(5),
        }
    }
}

/// Whether a dropped link in `phase` is worth chasing. Lobby members
/// just rejoin; a completed game has nothing to resume.
pub fn phase_is_resumable(phase: Phase) -> bool {
    !matches!(phase, Phase::Lobby | Phase::GameComplete)
}

pub struct Reconnector {
    config: ReconnectConfig,
    inflight: Arc<AtomicBool>,
}

impl Reconnector {
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            inflight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_inflight(&self) -> bool {
        self.inflight.load(Ordering::SeqCst)
    }

    /// Poll `session_code` until the host answers or `cancel` fires.
    /// Returns the fresh host link, or `None` when cancelled or when a
    /// loop is already running.
    pub async fn run<T: PeerTransport>(
        &self,
        transport: &T,
        session_code: &str,
        cancel: &CancellationToken,
    ) -> Option<PeerId> {
        if self.inflight.swap(true, Ordering::SeqCst) {
            warn!("reconnect already in flight, not starting another");
            return None;
        }
        let _guard = InflightGuard(Arc::clone(&self.inflight));

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let connect = tokio::time::timeout(self.config.attempt_timeout, transport.connect(session_code));
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(attempt, "reconnect cancelled");
                    return None;
                }
                result = connect => match result {
                    Ok(Ok(peer)) => {
                        info!(attempt, peer = %peer, "reconnected to host");
                        return Some(peer);
                    }
                    Ok(Err(err)) => {
                        warn!(attempt, error = %err, "reconnect attempt failed");
                    }
                    Err(_) => {
                        warn!(attempt, "reconnect attempt timed out");
                    }
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(attempt, "reconnect cancelled during cooldown");
                    return None;
                }
                _ = tokio::time::sleep(self.config.cooldown) => {}
            }
        }
    }
}

/// Clears the in-flight flag however the loop exits.
struct InflightGuard(Arc<AtomicBool>);

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
