//! Core game state store.
//!
//! This module contains the `GameState` snapshot, the `GameStore` session
//! object that owns it, and every command that mutates it.

use crate::actions::{GameAction, GameEvent};
use crate::cards::{create_deck, shuffle_deck, Card, Suit};
use crate::player::{Player, PlayerId, Position, MAX_PLAYERS};
use crate::trick::{Contract, Trick};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Seating and dealing
    Setup,
    /// Cards are being played to tricks
    Playing,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Setup => f.write_str("setup"),
            GamePhase::Playing => f.write_str("playing"),
        }
    }
}

/// Errors that can occur when applying commands
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("No cards left in deck")]
    EmptyDeck,

    #[error("Player {0} not found")]
    UnknownPlayer(PlayerId),

    #[error("Not enough cards: need {needed}, have {available}")]
    InsufficientCards { needed: usize, available: usize },

    #[error("Card {card_id} not found in player {player}'s hand")]
    CardNotInHand { player: PlayerId, card_id: String },

    #[error("Not allowed during the {0} phase")]
    WrongPhase(GamePhase),

    #[error("Player count must be between 1 and 4, got {0}")]
    InvalidPlayerCount(u8),

    #[error("{held} cards are out of the deck; reset instead")]
    CardsInPlay { held: usize },
}

/// Result of a successful card play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    /// Trick the card landed in
    pub trick_id: u32,
    pub card: Card,
    /// Whether that trick now holds four cards
    pub trick_complete: bool,
    /// Turn pointer after the play
    pub next_player: PlayerId,
}

/// Receives every event produced by successful commands, in order
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> GameObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// The complete, serializable game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Undealt cards; dealing takes from the end
    pub deck: Vec<Card>,
    /// Seated players, in seating order
    pub players: Vec<Player>,
    /// Current game phase
    pub phase: GamePhase,
    /// Trick being played
    pub current_trick: Trick,
    /// Whose turn it is
    pub current_player: PlayerId,
    /// Contract, once bidding is over
    pub contract: Option<Contract>,
    /// Completed tricks, oldest first
    pub trick_history: Vec<Trick>,
}

impl GameState {
    /// Empty table: no deck, no players
    pub fn new() -> Self {
        Self {
            deck: Vec::new(),
            players: Vec::new(),
            phase: GamePhase::Setup,
            current_trick: Trick::default(),
            current_player: 1,
            contract: None,
            trick_history: Vec::new(),
        }
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Cards held in hands
    pub fn cards_in_hands(&self) -> usize {
        self.players.iter().map(Player::hand_size).sum()
    }

    /// Cards on the table or in finished tricks
    pub fn cards_in_tricks(&self) -> usize {
        self.current_trick.len() + self.trick_history.iter().map(Trick::len).sum::<usize>()
    }

    /// Every card the table knows about, wherever it sits
    pub fn cards_in_play(&self) -> usize {
        self.deck.len() + self.cards_in_hands() + self.cards_in_tricks()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A single game session.
///
/// Owns the state, the shuffling RNG and any registered observers. Sessions
/// are independent; create as many as needed.
pub struct GameStore {
    state: GameState,
    rng: StdRng,
    observers: Vec<Box<dyn GameObserver>>,
}

impl fmt::Debug for GameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    /// Create a session shuffling from OS entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a session with reproducible shuffles
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            state: GameState::new(),
            rng,
            observers: Vec::new(),
        }
    }

    /// Register an observer for all future events
    pub fn subscribe<O: GameObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // ==================== Queries ====================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn deck(&self) -> &[Card] {
        &self.state.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.state.get_player(id)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn current_trick(&self) -> &Trick {
        &self.state.current_trick
    }

    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.state.contract.as_ref()
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.state.trick_history
    }

    /// Number of undealt cards
    pub fn cards_in_deck(&self) -> usize {
        self.state.deck.len()
    }

    /// Number of seated players
    pub fn player_count(&self) -> usize {
        self.state.players.len()
    }

    /// Deck, hands and tricks together
    pub fn cards_in_play(&self) -> usize {
        self.state.cards_in_play()
    }

    /// The whole state as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.state)
    }

    // ==================== Commands ====================

    /// Replace the deck with a freshly shuffled 52 cards.
    ///
    /// Only allowed while every card is still in the deck (or nothing has
    /// been dealt yet); once cards are out, use [`GameStore::reset`].
    pub fn initialize_deck(&mut self) -> Result<(), GameError> {
        self.cmd_initialize_deck().map(|(value, _)| value)
    }

    /// Seat `count` fresh players with ids `1..=count`.
    pub fn set_player_count(&mut self, count: u8) -> Result<(), GameError> {
        self.cmd_set_player_count(count).map(|(value, _)| value)
    }

    /// Move the last card of the deck into a player's hand.
    pub fn deal_card(&mut self, player_id: PlayerId) -> Result<Card, GameError> {
        self.cmd_deal_card(player_id).map(|(card, _)| card)
    }

    /// Deal one card to every player, or nothing if the deck is too short.
    pub fn deal_to_all(&mut self) -> Result<Vec<(PlayerId, Card)>, GameError> {
        self.cmd_deal_to_all().map(|(dealt, _)| dealt)
    }

    /// Deal `cards_per_player` rounds, or nothing if the deck is too short.
    pub fn deal_hands(&mut self, cards_per_player: u32) -> Result<(), GameError> {
        self.cmd_deal_hands(cards_per_player).map(|(value, _)| value)
    }

    /// Empty every hand and rebuild a shuffled 52-card deck.
    ///
    /// Cards already in the current trick or the trick history are left
    /// where they are, so afterwards the table can hold more than 52 cards.
    /// The `GameReset` event reports how many.
    pub fn reset(&mut self) {
        self.cmd_reset();
    }

    /// Skip bidding with a one-level contract in `trump` and start play.
    pub fn skip_bidding(&mut self, trump: Suit) -> Contract {
        self.cmd_skip_bidding(trump).0
    }

    /// Play `card_id` from a player's hand into the current trick.
    pub fn play_card(
        &mut self,
        player_id: PlayerId,
        card_id: &str,
    ) -> Result<PlayOutcome, GameError> {
        self.cmd_play_card(player_id, card_id).map(|(outcome, _)| outcome)
    }

    /// Apply a command and return the events it produced
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        let events = match action {
            GameAction::InitializeDeck => self.cmd_initialize_deck()?.1,
            GameAction::SetPlayerCount(count) => self.cmd_set_player_count(count)?.1,
            GameAction::DealCard(player_id) => self.cmd_deal_card(player_id)?.1,
            GameAction::DealToAll => self.cmd_deal_to_all()?.1,
            GameAction::DealHands(cards_per_player) => self.cmd_deal_hands(cards_per_player)?.1,
            GameAction::Reset => self.cmd_reset().1,
            GameAction::SkipBidding { trump } => self.cmd_skip_bidding(trump).1,
            GameAction::PlayCard { player, card_id } => self.cmd_play_card(player, &card_id)?.1,
        };

        Ok(events)
    }

    // ==================== Dispatch ====================
    // Each command is wired to its name and implementation exactly once here;
    // both the typed methods and `apply_action` go through these.

    fn cmd_initialize_deck(&mut self) -> Result<((), Vec<GameEvent>), GameError> {
        self.run("initialize_deck", |store, events| store.do_initialize_deck(events))
    }

    fn cmd_set_player_count(&mut self, count: u8) -> Result<((), Vec<GameEvent>), GameError> {
        self.run("set_player_count", |store, events| {
            store.do_set_player_count(count, events)
        })
    }

    fn cmd_deal_card(&mut self, player_id: PlayerId) -> Result<(Card, Vec<GameEvent>), GameError> {
        self.run("deal_card", |store, events| store.do_deal_card(player_id, events))
    }

    fn cmd_deal_to_all(
        &mut self,
    ) -> Result<(Vec<(PlayerId, Card)>, Vec<GameEvent>), GameError> {
        self.run("deal_to_all", |store, events| store.do_deal_to_all(events))
    }

    fn cmd_deal_hands(
        &mut self,
        cards_per_player: u32,
    ) -> Result<((), Vec<GameEvent>), GameError> {
        self.run("deal_hands", |store, events| {
            store.do_deal_hands(cards_per_player, events)
        })
    }

    fn cmd_reset(&mut self) -> ((), Vec<GameEvent>) {
        self.record("reset", |store, events| store.do_reset(events))
    }

    fn cmd_skip_bidding(&mut self, trump: Suit) -> (Contract, Vec<GameEvent>) {
        self.record("skip_bidding", |store, events| {
            store.do_skip_bidding(Contract::bypass(trump), events)
        })
    }

    fn cmd_play_card(
        &mut self,
        player_id: PlayerId,
        card_id: &str,
    ) -> Result<(PlayOutcome, Vec<GameEvent>), GameError> {
        self.run("play_card", |store, events| {
            store.do_play_card(player_id, card_id, events)
        })
    }

    // ==================== Helper Methods ====================

    /// Run a fallible command, log its outcome and publish its events on
    /// success. Commands validate before mutating, so a failure leaves state
    /// as it was.
    fn run<T, F>(&mut self, command: &'static str, op: F) -> Result<(T, Vec<GameEvent>), GameError>
    where
        F: FnOnce(&mut Self, &mut Vec<GameEvent>) -> Result<T, GameError>,
    {
        let mut events = Vec::new();
        match op(self, &mut events) {
            Ok(value) => {
                self.commit(command, &events);
                Ok((value, events))
            }
            Err(error) => {
                warn!(command, %error, "command rejected");
                Err(error)
            }
        }
    }

    /// Run a command that cannot be rejected.
    fn record<T, F>(&mut self, command: &'static str, op: F) -> (T, Vec<GameEvent>)
    where
        F: FnOnce(&mut Self, &mut Vec<GameEvent>) -> T,
    {
        let mut events = Vec::new();
        let value = op(self, &mut events);
        self.commit(command, &events);
        (value, events)
    }

    fn commit(&mut self, command: &'static str, events: &[GameEvent]) {
        debug!(command, events = events.len(), "command applied");
        self.publish(events);
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for observer in &mut self.observers {
            for event in events {
                observer.on_event(event);
            }
        }
    }

    fn fresh_deck(&mut self) -> usize {
        self.state.deck = shuffle_deck(&create_deck(), &mut self.rng);
        self.state.deck.len()
    }

    fn do_initialize_deck(&mut self, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
        let held = self.state.cards_in_hands() + self.state.cards_in_tricks();
        if held > 0 {
            return Err(GameError::CardsInPlay { held });
        }

        let cards = self.fresh_deck();
        events.push(GameEvent::DeckInitialized { cards });
        Ok(())
    }

    fn do_set_player_count(
        &mut self,
        count: u8,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        if count == 0 || count > MAX_PLAYERS {
            return Err(GameError::InvalidPlayerCount(count));
        }

        let discarded = self.state.cards_in_hands();
        if discarded > 0 {
            warn!(discarded, "reseating players discards the cards they held");
        }

        self.state.players = (1..=count)
            .filter_map(|id| Position::for_player(id).map(|position| Player::new(id, position)))
            .collect();

        events.push(GameEvent::PlayersSeated { count });
        Ok(())
    }

    fn do_deal_card(
        &mut self,
        player_id: PlayerId,
        events: &mut Vec<GameEvent>,
    ) -> Result<Card, GameError> {
        if self.state.deck.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        if self.state.get_player(player_id).is_none() {
            return Err(GameError::UnknownPlayer(player_id));
        }

        let card = self.state.deck.pop().ok_or(GameError::EmptyDeck)?;
        let player = self
            .state
            .get_player_mut(player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        player.receive(card);

        events.push(GameEvent::CardDealt {
            player: player_id,
            card,
        });
        Ok(card)
    }

    fn do_deal_to_all(
        &mut self,
        events: &mut Vec<GameEvent>,
    ) -> Result<Vec<(PlayerId, Card)>, GameError> {
        let needed = self.state.players.len();
        let available = self.state.deck.len();
        if available < needed {
            return Err(GameError::InsufficientCards { needed, available });
        }

        let mut dealt = Vec::with_capacity(needed);
        let GameState { deck, players, .. } = &mut self.state;
        for player in players.iter_mut() {
            if let Some(card) = deck.pop() {
                player.receive(card);
                dealt.push((player.id, card));
                events.push(GameEvent::CardDealt {
                    player: player.id,
                    card,
                });
            }
        }

        Ok(dealt)
    }

    fn do_deal_hands(
        &mut self,
        cards_per_player: u32,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        let players = self.state.players.len();
        if players == 0 || cards_per_player == 0 {
            return Ok(());
        }

        let available = self.state.deck.len();
        match cards_needed(players, cards_per_player) {
            Some(needed) if needed <= available => {}
            needed => {
                return Err(GameError::InsufficientCards {
                    needed: needed.unwrap_or(usize::MAX),
                    available,
                })
            }
        }

        for _ in 0..cards_per_player {
            self.do_deal_to_all(events)?;
        }
        Ok(())
    }

    fn do_reset(&mut self, events: &mut Vec<GameEvent>) {
        for player in &mut self.state.players {
            player.clear_hand();
        }

        let unreconciled = self.state.cards_in_tricks();
        if unreconciled > 0 {
            warn!(
                unreconciled,
                "reset leaves trick cards in place; the table now holds duplicates"
            );
        }

        let cards_in_deck = self.fresh_deck();
        events.push(GameEvent::GameReset {
            cards_in_deck,
            unreconciled,
        });
    }

    fn do_skip_bidding(&mut self, contract: Contract, events: &mut Vec<GameEvent>) -> Contract {
        self.state.contract = Some(contract);
        self.state.phase = GamePhase::Playing;
        self.state.current_player = 1;

        events.push(GameEvent::ContractSet { contract });
        events.push(GameEvent::PhaseChanged {
            phase: GamePhase::Playing,
        });
        events.push(GameEvent::TurnChanged { next_player: 1 });
        contract
    }

    fn do_play_card(
        &mut self,
        player_id: PlayerId,
        card_id: &str,
        events: &mut Vec<GameEvent>,
    ) -> Result<PlayOutcome, GameError> {
        if self.state.phase != GamePhase::Playing {
            return Err(GameError::WrongPhase(self.state.phase));
        }

        let not_in_hand = || GameError::CardNotInHand {
            player: player_id,
            card_id: card_id.to_string(),
        };

        let player = self
            .state
            .get_player(player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        if !player.holds(card_id) {
            return Err(not_in_hand());
        }

        // A complete trick stays on the table until the next card arrives.
        if self.state.current_trick.is_complete() {
            let next = self.state.current_trick.next();
            let finished = std::mem::replace(&mut self.state.current_trick, next);
            events.push(GameEvent::TrickArchived {
                trick_id: finished.id,
            });
            self.state.trick_history.push(finished);
        }

        let card = self
            .state
            .get_player_mut(player_id)
            .and_then(|p| p.take_card(card_id))
            .ok_or_else(not_in_hand)?;

        let trick = &mut self.state.current_trick;
        trick.add(player_id, card);
        let trick_id = trick.id;
        let cards_in_trick = trick.len();

        if cards_in_trick == 1 {
            events.push(GameEvent::TrickStarted {
                trick_id,
                leader: player_id,
            });
        }
        events.push(GameEvent::CardPlayed {
            player: player_id,
            card,
            trick_id,
        });

        // Turn order runs 1 -> 2 -> 3 -> 4 -> 1 from whoever led.
        if cards_in_trick == 1 {
            self.state.current_player = next_in_rotation(player_id);
            events.push(GameEvent::TurnChanged {
                next_player: self.state.current_player,
            });
        } else if cards_in_trick < Trick::CAPACITY {
            self.state.current_player = next_in_rotation(self.state.current_player);
            events.push(GameEvent::TurnChanged {
                next_player: self.state.current_player,
            });
        }

        let trick_complete = cards_in_trick >= Trick::CAPACITY;
        if trick_complete {
            events.push(GameEvent::TrickCompleted { trick_id });
        }

        Ok(PlayOutcome {
            trick_id,
            card,
            trick_complete,
            next_player: self.state.current_player,
        })
    }
}

/// Cards a deal of `per_player` to `players` seats takes; `None` on overflow.
fn cards_needed(players: usize, per_player: u32) -> Option<usize> {
    usize::try_from(per_player).ok()?.checked_mul(players)
}

fn next_in_rotation(player: PlayerId) -> PlayerId {
    (player % MAX_PLAYERS) + 1
}
