//! Integration tests for the bridge table.
//!
//! These tests drive a session through dealing and trick play the way a UI
//! would, checking state after every step.

use bridge_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

/// A four-player table with full 13-card hands
fn dealt_table(seed: u64) -> GameStore {
    let mut game = GameStore::with_seed(seed);
    game.set_player_count(4).unwrap();
    game.initialize_deck().unwrap();
    game.deal_hands(13).unwrap();
    game
}

/// Any card currently held by a player
fn any_card(game: &GameStore, player: PlayerId) -> Card {
    game.player(player).unwrap().hand[0]
}

/// Every card on the table, wherever it sits
fn all_cards(game: &GameStore) -> Vec<Card> {
    let state = game.state();
    let mut cards = state.deck.clone();
    for player in &state.players {
        cards.extend(player.hand.iter().copied());
    }
    for trick in state.trick_history.iter().chain(std::iter::once(&state.current_trick)) {
        cards.extend(trick.cards.iter().map(|pc| pc.card));
    }
    cards
}

#[test]
fn test_full_deal_distributes_every_card_once() {
    let game = dealt_table(1);

    let cards = all_cards(&game);
    assert_eq!(cards.len(), DECK_SIZE);
    let unique: HashSet<Card> = cards.into_iter().collect();
    assert_eq!(unique.len(), DECK_SIZE);
}

#[test]
fn test_trick_play_scenario() {
    let mut game = dealt_table(2);
    game.skip_bidding(Suit::Spades);
    assert_eq!(game.contract().map(|c| c.trump), Some(Suit::Spades));

    // Player 1 leads.
    let a = any_card(&game, 1);
    let outcome = game.play_card(1, &a.id()).unwrap();
    assert_eq!(game.player(1).unwrap().hand_size(), 12);
    assert_eq!(game.current_trick().cards.len(), 1);
    assert_eq!(game.current_trick().lead_player_id, Some(1));
    assert_eq!(game.current_trick().lead_suit, Some(a.suit));
    assert_eq!(game.current_player(), 2);
    assert_eq!(outcome.next_player, 2);
    assert!(!outcome.trick_complete);

    let b = any_card(&game, 2);
    game.play_card(2, &b.id()).unwrap();
    assert_eq!(game.current_trick().cards.len(), 2);
    assert_eq!(game.current_player(), 3);

    for player in [3, 4] {
        let card = any_card(&game, player);
        game.play_card(player, &card.id()).unwrap();
    }
    assert_eq!(game.current_trick().cards.len(), 4);
    assert!(game.current_trick().is_complete());
    let first_trick_id = game.current_trick().id;

    // The next card opens a new trick.
    let e = any_card(&game, 1);
    let outcome = game.play_card(1, &e.id()).unwrap();
    assert_eq!(outcome.trick_id, first_trick_id + 1);
    assert_eq!(game.current_trick().id, first_trick_id + 1);
    assert_eq!(game.current_trick().cards.len(), 1);
    assert_eq!(game.current_trick().lead_suit, Some(e.suit));
    assert_eq!(game.trick_history().len(), 1);

    let played: Vec<PlayerId> = game.trick_history()[0]
        .cards
        .iter()
        .map(|pc| pc.player_id)
        .collect();
    assert_eq!(played, vec![1, 2, 3, 4]);
}

#[test]
fn test_play_all_thirteen_tricks() {
    let mut game = dealt_table(3);
    game.skip_bidding(Suit::Hearts);

    for _ in 0..13 {
        for player in 1..=4 {
            let card = any_card(&game, player);
            game.play_card(player, &card.id()).unwrap();
        }
    }

    assert!(game.players().iter().all(|p| p.hand.is_empty()));
    assert_eq!(game.trick_history().len(), 12);
    assert_eq!(game.current_trick().id, 13);
    assert!(game.current_trick().is_complete());
    assert_eq!(all_cards(&game).len(), DECK_SIZE);
    assert!(game.players().iter().all(|p| p.tricks_won == 0));
}

#[test]
fn test_play_card_rejected_during_setup() {
    let mut game = dealt_table(4);
    let card = any_card(&game, 1);
    let before = game.state().clone();

    let result = game.play_card(1, &card.id());
    assert_eq!(result, Err(GameError::WrongPhase(GamePhase::Setup)));
    assert_eq!(game.state(), &before);
}

#[test]
fn test_reset_after_partial_deal() {
    let mut game = GameStore::with_seed(5);
    game.set_player_count(4).unwrap();
    game.initialize_deck().unwrap();
    game.deal_hands(6).unwrap();
    let old_deck = game.deck().to_vec();

    game.reset();
    assert!(game.players().iter().all(|p| p.hand.is_empty()));
    assert_eq!(game.cards_in_deck(), DECK_SIZE);
    assert_ne!(game.deck(), old_deck.as_slice());

    let unique: HashSet<Card> = game.deck().iter().copied().collect();
    assert_eq!(unique.len(), DECK_SIZE);
}

#[test]
fn test_apply_action_json_flow() {
    let mut game = GameStore::with_seed(6);
    let script = [
        r#"{"SetPlayerCount":4}"#,
        r#""InitializeDeck""#,
        r#"{"DealHands":13}"#,
        r#"{"SkipBidding":{"trump":"clubs"}}"#,
    ];
    for line in script {
        let action: GameAction = serde_json::from_str(line).unwrap();
        game.apply_action(action).unwrap();
    }

    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.contract(), Some(&Contract::bypass(Suit::Clubs)));
    assert_eq!(game.cards_in_deck(), 0);
}

#[test]
fn test_independent_sessions() {
    let mut first = dealt_table(7);
    let second = dealt_table(7);
    first.reset();

    assert!(first.players().iter().all(|p| p.hand.is_empty()));
    assert!(second.players().iter().all(|p| p.hand_size() == 13));
}

#[derive(Debug, Clone)]
enum Step {
    DealCard(PlayerId),
    DealToAll,
    DealHands(u32),
    Play(PlayerId, usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..=5).prop_map(Step::DealCard),
        Just(Step::DealToAll),
        (0u32..=14).prop_map(Step::DealHands),
        ((0u8..=5), any::<usize>()).prop_map(|(p, i)| Step::Play(p, i)),
    ]
}

proptest! {
    /// Dealing and playing only ever move cards; none appear or vanish.
    #[test]
    fn prop_cards_are_conserved(
        seed in any::<u64>(),
        players in 1u8..=4,
        play_from in 0usize..20,
        steps in proptest::collection::vec(step(), 0..80),
    ) {
        let mut game = GameStore::with_seed(seed);
        game.set_player_count(players).unwrap();
        game.initialize_deck().unwrap();

        for (n, step) in steps.into_iter().enumerate() {
            if n == play_from {
                game.skip_bidding(Suit::Hearts);
            }
            let before = game.state().clone();
            let result = match step {
                Step::DealCard(p) => game.deal_card(p).map(|_| ()),
                Step::DealToAll => game.deal_to_all().map(|_| ()),
                Step::DealHands(k) => game.deal_hands(k),
                Step::Play(p, i) => {
                    let card_id = game
                        .player(p)
                        .filter(|pl| !pl.hand.is_empty())
                        .map(|pl| pl.hand[i % pl.hand.len()].id())
                        .unwrap_or_else(|| "ace_of_spades".to_string());
                    game.play_card(p, &card_id).map(|_| ())
                }
            };

            if result.is_err() {
                prop_assert_eq!(game.state(), &before);
            }
            prop_assert_eq!(game.cards_in_play(), DECK_SIZE);
            let unique: HashSet<Card> = all_cards(&game).into_iter().collect();
            prop_assert_eq!(unique.len(), DECK_SIZE);
        }
    }
}
