//! Local hot-seat bridge table.

use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_core::{GameEvent, GameStore};

mod config;
mod console;

use config::TableConfig;
use console::{parse_command, Command, HELP};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = TableConfig::from_env()?;
    info!(?config, "Opening bridge table");

    let mut game = match config.seed {
        Some(seed) => GameStore::with_seed(seed),
        None => GameStore::new(),
    };
    game.subscribe(|event: &GameEvent| {
        if let Ok(json) = serde_json::to_string(event) {
            info!(target: "bridge_table::events", "{}", json);
        }
    });

    game.set_player_count(config.players)?;
    game.initialize_deck()?;
    game.deal_hands(config.cards_per_player)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", HELP)?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line, config.trump) {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };

        match command {
            Command::Action(action) => match game.apply_action(action) {
                Ok(events) => writeln!(stdout, "ok ({} events)", events.len())?,
                Err(e) => writeln!(stdout, "rejected: {}", e)?,
            },
            Command::Hand(id) => match game.player(id) {
                Some(player) => {
                    let cards: Vec<String> = player.hand.iter().map(|c| c.id()).collect();
                    writeln!(stdout, "{} ({}): {}", player.id, player.position, cards.join(" "))?;
                }
                None => writeln!(stdout, "no player {}", id)?,
            },
            Command::Trick => {
                writeln!(stdout, "{}", serde_json::to_string_pretty(game.current_trick())?)?;
                writeln!(stdout, "to play: {}", game.current_player())?;
            }
            Command::State => writeln!(stdout, "{}", game.to_json()?)?,
            Command::Help => writeln!(stdout, "{}", HELP)?,
            Command::Quit => break,
        }
        stdout.flush()?;
    }

    if game.cards_in_play() != bridge_core::DECK_SIZE {
        warn!(cards = game.cards_in_play(), "Table closed with an inconsistent card count");
    }
    info!("Table closed");
    Ok(())
}
