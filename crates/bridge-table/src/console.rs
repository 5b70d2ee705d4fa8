//! Console commands for a local table.

use bridge_core::{GameAction, PlayerId, Suit};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  seat <n>              seat n players (1-4)
  init                  shuffle a fresh deck (before dealing)
  deal <player>         deal one card to a player
  deal-all              deal one card to every player
  deal-hands <n>        deal n cards to every player
  reset                 empty all hands and reshuffle
  skip [suit]           skip bidding (default trump: configured suit)
  play <player> <card>  play a card, e.g. `play 1 queen_of_spades`
  hand <player>         show a player's hand
  trick                 show the current trick
  state                 print the full state as JSON
  help                  show this text
  quit                  leave the table";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the game store
    Action(GameAction),
    Hand(PlayerId),
    Trick,
    State,
    Help,
    Quit,
}

/// Parse one line of input; `default_trump` fills in a bare `skip`.
pub fn parse_command(line: &str, default_trump: Suit) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(CommandError::Empty)?;
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("seat", [n]) => Command::Action(GameAction::SetPlayerCount(number(n, "seat <n>")?)),
        ("init", []) => Command::Action(GameAction::InitializeDeck),
        ("deal", [p]) => Command::Action(GameAction::DealCard(number(p, "deal <player>")?)),
        ("deal-all", []) => Command::Action(GameAction::DealToAll),
        ("deal-hands", [n]) => {
            Command::Action(GameAction::DealHands(number(n, "deal-hands <n>")?))
        }
        ("reset", []) => Command::Action(GameAction::Reset),
        ("skip", []) => Command::Action(GameAction::SkipBidding {
            trump: default_trump,
        }),
        ("skip", [suit]) => Command::Action(GameAction::SkipBidding {
            trump: suit.parse().map_err(|_| CommandError::Usage("skip [suit]"))?,
        }),
        ("play", [p, card]) => Command::Action(GameAction::PlayCard {
            player: number(p, "play <player> <card>")?,
            card_id: card.to_lowercase(),
        }),
        ("hand", [p]) => Command::Hand(number(p, "hand <player>")?),
        ("trick", []) => Command::Trick,
        ("state", []) => Command::State,
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("seat", _) => return Err(CommandError::Usage("seat <n>")),
        ("deal", _) => return Err(CommandError::Usage("deal <player>")),
        ("deal-hands", _) => return Err(CommandError::Usage("deal-hands <n>")),
        ("play", _) => return Err(CommandError::Usage("play <player> <card>")),
        ("hand", _) => return Err(CommandError::Usage("hand <player>")),
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };

    Ok(command)
}

fn number<T: std::str::FromStr>(word: &str, usage: &'static str) -> Result<T, CommandError> {
    word.parse().map_err(|_| CommandError::Usage(usage))
}
