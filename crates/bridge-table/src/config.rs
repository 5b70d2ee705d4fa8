//! Table configuration read from the environment.

use bridge_core::{Suit, DECK_SIZE, MAX_PLAYERS};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("{players} players with {cards_per_player} cards each needs more than 52 cards")]
    DealTooLarge { players: u8, cards_per_player: u32 },
}

/// Settings for a local table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Fixed shuffle seed (`BRIDGE_SEED`); random when unset
    pub seed: Option<u64>,
    /// Seats to fill (`BRIDGE_PLAYERS`)
    pub players: u8,
    /// Cards dealt to each seat at start (`BRIDGE_CARDS_PER_PLAYER`)
    pub cards_per_player: u32,
    /// Trump used when bidding is skipped (`BRIDGE_TRUMP`)
    pub trump: Suit,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            players: MAX_PLAYERS,
            cards_per_player: 13,
            trump: Suit::Hearts,
        }
    }
}

impl TableConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BRIDGE_SEED") {
            config.seed = Some(parse("BRIDGE_SEED", value)?);
        }
        if let Some(value) = lookup("BRIDGE_PLAYERS") {
            let players: u8 = parse("BRIDGE_PLAYERS", value.clone())?;
            if players == 0 || players > MAX_PLAYERS {
                return Err(ConfigError::Invalid {
                    name: "BRIDGE_PLAYERS",
                    value,
                });
            }
            config.players = players;
        }
        if let Some(value) = lookup("BRIDGE_CARDS_PER_PLAYER") {
            config.cards_per_player = parse("BRIDGE_CARDS_PER_PLAYER", value)?;
        }
        if let Some(value) = lookup("BRIDGE_TRUMP") {
            config.trump = parse("BRIDGE_TRUMP", value)?;
        }

        if config.cards_per_player as usize * config.players as usize > DECK_SIZE {
            return Err(ConfigError::DealTooLarge {
                players: config.players,
                cards_per_player: config.cards_per_player,
            });
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
