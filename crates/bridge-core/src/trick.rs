//! Tricks and the contract they are played under.

use crate::cards::{Card, Suit};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// A card on the table together with who played it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub player_id: PlayerId,
    pub card: Card,
}

/// One round of play: each player contributes a single card.
///
/// `winner_id` is carried for consumers but nothing resolves it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    /// Trick number, starting at 1
    pub id: u32,
    /// Cards in the order they were played
    pub cards: Vec<PlayedCard>,
    /// Who played the first card
    pub lead_player_id: Option<PlayerId>,
    /// Who took the trick
    pub winner_id: Option<PlayerId>,
    /// Suit of the first card
    pub lead_suit: Option<Suit>,
}

impl Trick {
    /// Cards in a complete trick
    pub const CAPACITY: usize = 4;

    /// Create an empty trick
    pub fn new(id: u32) -> Self {
        Self {
            id,
            cards: Vec::with_capacity(Self::CAPACITY),
            lead_player_id: None,
            winner_id: None,
            lead_suit: None,
        }
    }

    /// The empty trick following this one
    pub fn next(&self) -> Self {
        Self::new(self.id + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() >= Self::CAPACITY
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Put a card on the table; the first card sets the lead.
    pub fn add(&mut self, player_id: PlayerId, card: Card) {
        if self.cards.is_empty() {
            self.lead_player_id = Some(player_id);
            self.lead_suit = Some(card.suit);
        }
        self.cards.push(PlayedCard { player_id, card });
    }
}

impl Default for Trick {
    fn default() -> Self {
        Self::new(1)
    }
}

/// The contract the hand is played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub level: u8,
    pub trump: Suit,
    pub declarer: PlayerId,
    /// Tricks the declarer needs
    pub target: u8,
}

impl Contract {
    /// Default contract used when bidding is skipped: one of `trump`,
    /// declared by player 1, needing seven tricks.
    pub fn bypass(trump: Suit) -> Self {
        Self {
            level: 1,
            trump,
            declarer: 1,
            target: 7,
        }
    }
}
