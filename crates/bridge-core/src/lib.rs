//! Bridge table - game state for a four-handed trick-taking card game
//!
//! This crate provides the in-memory state behind a bridge-style table:
//! - A 52-card deck factory with a uniform shuffle
//! - Player seating, dealing and hands
//! - Tricks, turn order and a bypass contract
//! - A session object (`GameStore`) exposing queries and commands
//!
//! # Architecture
//!
//! Every command validates before it mutates and returns a typed
//! `Result`, so a rejected command leaves the table untouched. Successful
//! commands emit `GameEvent`s to any registered `GameObserver`; a UI
//! re-renders from those instead of from reactive fields.
//!
//! The crate can be compiled to:
//! - Native Rust, embedded in any host process
//! - WebAssembly (feature `wasm`) for a browser front end
//!
//! # Modules
//!
//! - [`cards`]: Suits, ranks, cards and the deck factory
//! - [`player`]: Player state and seating
//! - [`trick`]: Tricks and the contract
//! - [`actions`]: Commands and events
//! - [`game`]: The game store

pub mod actions;
pub mod cards;
pub mod game;
pub mod player;
pub mod trick;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use cards::{create_deck, shuffle_deck, Card, CardParseError, Rank, Suit, DECK_SIZE};
pub use game::{GameError, GameObserver, GamePhase, GameState, GameStore, PlayOutcome};
pub use player::{Player, PlayerId, Position, MAX_PLAYERS};
pub use trick::{Contract, PlayedCard, Trick};
