//! Message dispatch: permission checks, validators, handlers.

pub mod client;
pub mod host;
pub mod validate;

#[cfg(test)]
mod tests_dispatch;

pub use client::{ClientDispatcher, ClientEvent};
pub use host::{HostDispatcher, Outbound};
pub use validate::{Rejection, Validator};

use crate::net::transport::PeerId;
use crate::protocol::messages::Envelope;

/// What one dispatched envelope produced: messages to send and events
/// for the embedding application. Hosts produce outbound traffic,
/// clients produce events.
#[derive(Debug, Default)]
pub struct DispatchOutput {
    pub outbound: Vec<Outbound>,
    pub events: Vec<ClientEvent>,
}

impl DispatchOutput {
    fn sending(outbound: Vec<Outbound>) -> Self {
        Self { outbound, events: Vec::new() }
    }

    fn raising(events: Vec<ClientEvent>) -> Self {
        Self { outbound: Vec::new(), events }
    }
}

/// Role-dependent dispatch, one per session.
pub enum Dispatcher {
    Host(HostDispatcher),
    Client(ClientDispatcher),
}

impl Dispatcher {
    pub fn handle(&mut self, from: PeerId, envelope: Envelope) -> DispatchOutput {
        match self {
            Dispatcher::Host(host) => DispatchOutput::sending(host.handle(from, envelope)),
            Dispatcher::Client(client) => DispatchOutput::raising(client.handle(from, envelope)),
        }
    }

    pub fn handle_link_closed(&mut self, peer: PeerId) -> DispatchOutput {
        match self {
            Dispatcher::Host(host) => DispatchOutput::sending(host.handle_link_closed(peer)),
            // The client's only link is the host; loss is handled by the
            // session's reconnect policy, not by dispatch.
            Dispatcher::Client(_) => DispatchOutput::default(),
        }
    }
}
