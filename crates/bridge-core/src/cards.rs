//! Playing cards and the deck factory.
//!
//! This module contains:
//! - Suit and rank enumerations in deck order
//! - The `Card` value type and its string id (`queen_of_spades`)
//! - `create_deck` / `shuffle_deck` for building a fresh shuffled deck

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of cards in a full deck
pub const DECK_SIZE: usize = 52;

/// Card suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits, in the order the deck is built
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Lowercase name used in card ids
    pub fn name(&self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suit {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CardParseError::UnknownSuit(s.to_string()))
    }
}

/// Card ranks, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "jack")]
    Jack,
    #[serde(rename = "queen")]
    Queen,
    #[serde(rename = "king")]
    King,
    #[serde(rename = "ace")]
    Ace,
}

impl Rank {
    /// All ranks, in the order the deck is built within a suit
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Name used in card ids
    pub fn name(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Ace => "ace",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rank {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CardParseError::UnknownRank(s.to_string()))
    }
}

/// Errors from parsing card ids, suits or ranks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("Malformed card id: {0}")]
    Malformed(String),

    #[error("Unknown suit: {0}")]
    UnknownSuit(String),

    #[error("Unknown rank: {0}")]
    UnknownRank(String),
}

/// A single playing card.
///
/// The card id (`"{rank}_of_{suit}"`) is derived from the rank and suit, so
/// two cards are equal exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "CardRepr", from = "CardRepr")]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// Create a card
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Stable string id, e.g. `10_of_hearts`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_of_{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank, suit) = s
            .split_once("_of_")
            .ok_or_else(|| CardParseError::Malformed(s.to_string()))?;
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }
}

/// Wire form of a card: the id travels with it for UI consumers
#[derive(Serialize, Deserialize)]
struct CardRepr {
    suit: Suit,
    rank: Rank,
    #[serde(default, skip_deserializing)]
    id: String,
}

impl From<Card> for CardRepr {
    fn from(card: Card) -> Self {
        Self {
            suit: card.suit,
            rank: card.rank,
            id: card.id(),
        }
    }
}

impl From<CardRepr> for Card {
    fn from(repr: CardRepr) -> Self {
        Card::new(repr.rank, repr.suit)
    }
}

/// Build a fresh, ordered 52-card deck.
///
/// Suits are iterated hearts, diamonds, clubs, spades and within each suit
/// ranks run from 2 up to ace.
pub fn create_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Return a uniformly shuffled copy of `deck`, leaving the input untouched.
///
/// `SliceRandom::shuffle` is a Fisher-Yates pass: for each index `i` from the
/// last down to 1 it swaps with a uniform `j` in `0..=i`.
pub fn shuffle_deck<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_create_deck_has_52_unique_cards() {
        let deck = create_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let ids: HashSet<String> = deck.iter().map(Card::id).collect();
        assert_eq!(ids.len(), DECK_SIZE);

        for suit in Suit::ALL {
            for rank in Rank::ALL {
                assert!(deck.contains(&Card::new(rank, suit)));
            }
        }
    }

    #[test]
    fn test_create_deck_order() {
        let deck = create_deck();
        assert_eq!(deck[0], Card::new(Rank::Two, Suit::Hearts));
        assert_eq!(deck[12], Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(deck[13], Card::new(Rank::Two, Suit::Diamonds));
        assert_eq!(deck[51], Card::new(Rank::Ace, Suit::Spades));
    }

    #[test]
    fn test_card_id_roundtrip() {
        let card = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(card.id(), "10_of_hearts");
        assert_eq!("10_of_hearts".parse::<Card>(), Ok(card));
        assert_eq!(
            "queen_of_spades".parse::<Card>(),
            Ok(Card::new(Rank::Queen, Suit::Spades))
        );
    }

    #[test]
    fn test_card_parse_errors() {
        assert_eq!(
            "joker".parse::<Card>(),
            Err(CardParseError::Malformed("joker".into()))
        );
        assert_eq!(
            "1_of_hearts".parse::<Card>(),
            Err(CardParseError::UnknownRank("1".into()))
        );
        assert_eq!(
            "ace_of_cups".parse::<Card>(),
            Err(CardParseError::UnknownSuit("cups".into()))
        );
    }

    #[test]
    fn test_card_json_carries_id() {
        let card = Card::new(Rank::Jack, Suit::Clubs);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "suit": "clubs", "rank": "jack", "id": "jack_of_clubs" })
        );

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_shuffle_does_not_mutate_input() {
        let deck = create_deck();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffle_deck(&deck, &mut rng);

        assert_eq!(deck, create_deck());
        assert_eq!(shuffled.len(), deck.len());
        assert_ne!(shuffled, deck);
    }

    #[test]
    fn test_shuffle_empty_and_singleton() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffle_deck(&[], &mut rng).is_empty());

        let single = [Card::new(Rank::Ace, Suit::Spades)];
        assert_eq!(shuffle_deck(&single, &mut rng), single.to_vec());
    }

    #[test]
    fn test_shuffle_is_uniform_over_small_deck() {
        // 3 cards have 6 orderings; each should show up about 1/6 of the time.
        let deck = [
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::Three, Suit::Hearts),
            Card::new(Rank::Four, Suit::Hearts),
        ];
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 60_000;
        let mut counts: HashMap<Vec<Card>, u32> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(shuffle_deck(&deck, &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials / 6;
        for (order, count) in &counts {
            let deviation = (*count as i64 - expected as i64).unsigned_abs();
            assert!(
                deviation < expected as u64 / 20,
                "ordering {:?} seen {} times, expected about {}",
                order,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_first_position_is_uniform_over_full_deck() {
        let deck = create_deck();
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 52_000;
        let mut firsts: HashMap<Card, u32> = HashMap::new();
        for _ in 0..trials {
            *firsts.entry(shuffle_deck(&deck, &mut rng)[0]).or_default() += 1;
        }

        assert_eq!(firsts.len(), DECK_SIZE);
        // Expected 1000 per card, standard deviation about 31.
        for count in firsts.values() {
            assert!((850..1150).contains(count), "biased count {}", count);
        }
    }
}
