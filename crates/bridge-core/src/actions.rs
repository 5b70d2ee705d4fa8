//! Commands a table can receive and the events they produce.

use crate::cards::{Card, Suit};
use crate::game::GamePhase;
use crate::player::PlayerId;
use crate::trick::Contract;
use serde::{Deserialize, Serialize};

/// All commands the game store accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Setup ====================
    /// Replace the deck with a freshly shuffled one
    InitializeDeck,
    /// Seat a new set of players
    SetPlayerCount(u8),

    // ==================== Dealing ====================
    /// Deal one card to one player
    DealCard(PlayerId),
    /// Deal one card to every player
    DealToAll,
    /// Deal this many cards to every player
    DealHands(u32),
    /// Empty every hand and reshuffle
    Reset,

    // ==================== Play ====================
    /// Set a default contract and start play
    SkipBidding {
        #[serde(default = "default_trump")]
        trump: Suit,
    },
    /// Play a card from a player's hand
    PlayCard { player: PlayerId, card_id: String },
}

/// Trump used when none is named
pub fn default_trump() -> Suit {
    Suit::Hearts
}

/// Events emitted by successful commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh shuffled deck replaced the old one
    DeckInitialized { cards: usize },

    /// Players were (re)seated
    PlayersSeated { count: u8 },

    /// A card moved from the deck to a hand
    CardDealt { player: PlayerId, card: Card },

    /// Hands were emptied and the deck rebuilt
    GameReset {
        cards_in_deck: usize,
        /// Cards still sitting in tricks, now duplicated by the new deck
        unreconciled: usize,
    },

    /// A contract was fixed
    ContractSet { contract: Contract },

    /// The game moved to a new phase
    PhaseChanged { phase: GamePhase },

    /// A complete trick was moved to the history
    TrickArchived { trick_id: u32 },

    /// The first card of a trick was played
    TrickStarted { trick_id: u32, leader: PlayerId },

    /// A card was played to the current trick
    CardPlayed {
        player: PlayerId,
        card: Card,
        trick_id: u32,
    },

    /// The current trick holds a card from every seat
    TrickCompleted { trick_id: u32 },

    /// The turn pointer moved
    TurnChanged { next_player: PlayerId },
}
