//! WebAssembly bindings for the bridge table.
//!
//! This module exposes a game session to JavaScript through wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::game::GameStore;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game session
#[wasm_bindgen]
pub struct WasmGame {
    store: GameStore,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a session with `player_count` seats and a shuffled deck
    #[wasm_bindgen(constructor)]
    pub fn new(player_count: u8) -> Result<WasmGame, JsValue> {
        let mut store = GameStore::new();
        store
            .set_player_count(player_count)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        store
            .initialize_deck()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { store })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.store.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        self.store.phase().to_string()
    }

    /// Get the player whose turn it is
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.store.current_player()
    }

    /// Number of undealt cards
    #[wasm_bindgen(js_name = getCardsInDeck)]
    pub fn get_cards_in_deck(&self) -> usize {
        self.store.cards_in_deck()
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player: u8) -> String {
        match self.store.player(player) {
            Some(p) => serde_json::to_string(p).unwrap_or_else(|_| "{}".to_string()),
            None => "null".to_string(),
        }
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.store.apply_action(action) {
            Ok(events) => {
                Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }
}
