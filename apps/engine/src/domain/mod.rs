//! Domain layer: pure game logic types and helpers.

pub mod bidding;
pub mod cards;
pub mod dealer;
pub mod dealing;
pub mod engine;
pub mod farmers;
pub mod ranking;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod tests_dealer_selection;
#[cfg(test)]
mod tests_farmers;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_snapshot;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards::{Card, Rank, Suit};
pub use engine::GameEngine;
pub use ranking::{card_beats, effective_suit};
pub use snapshot::{public_for, PublicGameState};
pub use state::{GameId, GameOptions, GameState, Phase, PlayerId, Seat};
