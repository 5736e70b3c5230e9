use thiserror::Error;

use crate::player::PlayerId;

/// Every way the engine can refuse an operation. Illegal actions leave the
/// table untouched; `DeckExhausted` is the only variant raised after the hand
/// has already been aborted.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GameError {
    #[error("Invalid raise amount: {amount}, minimum: {minimum}")]
    InvalidRaise { amount: u32, minimum: u32 },
    #[error("Cannot check while owing {owed} chips")]
    CannotCheck { owed: u32 },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Hand is still being played")]
    HandNotComplete,
    #[error("No action is pending")]
    NoActionPending,
    #[error("Betting on the current street is not finished")]
    StreetNotComplete,
    #[error("Player {0} already folded")]
    PlayerAlreadyFolded(PlayerId),
    #[error("Player {0} is all-in")]
    PlayerAllIn(PlayerId),
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("Player {0} is not seated at this table")]
    UnknownSeat(PlayerId),
    #[error("Player {0} is already seated")]
    AlreadySeated(PlayerId),
    #[error("Table is full ({0} seats)")]
    TableFull(usize),
    #[error("Need at least {needed} players, have {actual}")]
    NotEnoughPlayers { needed: usize, actual: usize },
    #[error("Player {0} has no chips")]
    EmptyStack(PlayerId),
    #[error("Seating player {0} would put more than 4294967295 chips on the table")]
    ChipLimit(PlayerId),
    #[error("Invalid player name: {0}")]
    InvalidName(String),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}
