//! Player state and seating.

use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identifier (1-4 at a four-handed table)
pub type PlayerId = u8;

/// Most players a table seats
pub const MAX_PLAYERS: u8 = 4;

/// Seat at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    South,
    West,
    North,
    East,
}

impl Position {
    /// Seating order; player `n` takes `SEATING[n - 1]`
    pub const SEATING: [Position; 4] = [
        Position::South,
        Position::West,
        Position::North,
        Position::East,
    ];

    /// Seat for a player id, if the id is seatable
    pub fn for_player(id: PlayerId) -> Option<Self> {
        let index = usize::from(id).checked_sub(1)?;
        Self::SEATING.get(index).copied()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::South => "south",
            Position::West => "west",
            Position::North => "north",
            Position::East => "east",
        };
        f.write_str(name)
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (1-4)
    pub id: PlayerId,
    /// Cards held; order carries no meaning for play
    pub hand: Vec<Card>,
    /// Whether a person (rather than the table) controls this seat
    pub is_human: bool,
    /// Seat at the table
    pub position: Position,
    /// Tricks taken so far
    pub tricks_won: u32,
}

impl Player {
    /// Create a seated player with an empty hand
    pub fn new(id: PlayerId, position: Position) -> Self {
        Self {
            id,
            hand: Vec::new(),
            is_human: id == 1,
            position,
            tricks_won: 0,
        }
    }

    /// Number of cards held
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// Whether the player holds a card with this id
    pub fn holds(&self, card_id: &str) -> bool {
        self.find_card(card_id).is_some()
    }

    /// Index of a card in hand, looked up by id
    pub fn find_card(&self, card_id: &str) -> Option<usize> {
        self.hand.iter().position(|c| c.id() == card_id)
    }

    /// Take a card out of the hand by id
    pub fn take_card(&mut self, card_id: &str) -> Option<Card> {
        let index = self.find_card(card_id)?;
        Some(self.hand.remove(index))
    }

    /// Add a dealt card to the hand
    pub fn receive(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Throw away every card held
    pub fn clear_hand(&mut self) {
        self.hand.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn test_position_for_player() {
        assert_eq!(Position::for_player(1), Some(Position::South));
        assert_eq!(Position::for_player(2), Some(Position::West));
        assert_eq!(Position::for_player(3), Some(Position::North));
        assert_eq!(Position::for_player(4), Some(Position::East));
        assert_eq!(Position::for_player(0), None);
        assert_eq!(Position::for_player(5), None);
    }

    #[test]
    fn test_only_first_player_is_human() {
        assert!(Player::new(1, Position::South).is_human);
        assert!(!Player::new(2, Position::West).is_human);
    }

    #[test]
    fn test_take_card_by_id() {
        let mut player = Player::new(1, Position::South);
        player.receive(Card::new(Rank::Ace, Suit::Spades));
        player.receive(Card::new(Rank::Two, Suit::Clubs));

        assert!(player.holds("ace_of_spades"));
        assert_eq!(
            player.take_card("ace_of_spades"),
            Some(Card::new(Rank::Ace, Suit::Spades))
        );
        assert!(!player.holds("ace_of_spades"));
        assert_eq!(player.take_card("ace_of_spades"), None);
        assert_eq!(player.hand_size(), 1);
    }

    #[test]
    fn test_clear_hand() {
        let mut player = Player::new(3, Position::North);
        player.receive(Card::new(Rank::King, Suit::Hearts));
        player.clear_hand();
        assert!(player.hand.is_empty());
    }
}
