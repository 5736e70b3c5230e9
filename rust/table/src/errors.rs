/// Error classification and presentation-facing error payloads.
///
/// Every runtime error maps to a machine-readable code, a human message and
/// a severity that decides how loudly it is logged.
use riverboat_engine::errors::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::settings::SettingsError;

/// Error payload handed to presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "not_your_turn")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Rejected player input; expected during normal play
    Client,
    /// Unexpected failure inside the runtime or a collaborator
    Server,
    /// Table state can no longer be trusted
    Critical,
}

/// Conversion of an error into an [`ErrorResponse`], with logging.
pub trait IntoErrorResponse {
    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Client
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Logs at a level matching the severity and returns the payload.
    fn log_error(&self, table_id: &str) -> ErrorResponse {
        let response = self.to_error_response();
        match self.severity() {
            ErrorSeverity::Client => tracing::info!(
                table_id = %table_id,
                error = %response.error,
                "rejected: {}",
                response.message
            ),
            ErrorSeverity::Server => tracing::error!(
                table_id = %table_id,
                error = %response.error,
                "table error: {}",
                response.message
            ),
            ErrorSeverity::Critical => tracing::error!(
                table_id = %table_id,
                error = %response.error,
                critical = true,
                "critical table error: {}",
                response.message
            ),
        }
        response
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Table state poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for TableError {
    fn error_code(&self) -> &'static str {
        match self {
            TableError::Game(e) => game_error_code(e),
            TableError::Ledger(_) => "ledger_error",
            TableError::Settings(_) => "invalid_settings",
            TableError::StoragePoisoned => "table_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            TableError::Game(GameError::NotPlayersTurn { expected, actual }) => {
                Some(serde_json::json!({ "expected": expected, "actual": actual }))
            }
            TableError::Game(GameError::InvalidRaise { amount, minimum }) => {
                Some(serde_json::json!({ "amount": amount, "minimum": minimum }))
            }
            TableError::Game(GameError::CannotCheck { owed }) => {
                Some(serde_json::json!({ "owed": owed }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            TableError::StoragePoisoned => ErrorSeverity::Critical,
            TableError::Ledger(_) | TableError::Game(GameError::DeckExhausted) => {
                ErrorSeverity::Server
            }
            _ => ErrorSeverity::Client,
        }
    }
}

fn game_error_code(e: &GameError) -> &'static str {
    match e {
        GameError::InvalidRaise { .. } => "invalid_raise",
        GameError::CannotCheck { .. } => "cannot_check",
        GameError::NoHandInProgress => "no_hand_in_progress",
        GameError::HandInProgress => "hand_in_progress",
        GameError::HandAlreadyComplete => "hand_already_complete",
        GameError::HandNotComplete => "hand_not_complete",
        GameError::NoActionPending => "no_action_pending",
        GameError::StreetNotComplete => "street_not_complete",
        GameError::PlayerAlreadyFolded(_) => "player_folded",
        GameError::PlayerAllIn(_) => "player_all_in",
        GameError::NotPlayersTurn { .. } => "not_your_turn",
        GameError::UnknownSeat(_) => "unknown_seat",
        GameError::AlreadySeated(_) => "already_seated",
        GameError::TableFull(_) => "table_full",
        GameError::NotEnoughPlayers { .. } => "not_enough_players",
        GameError::EmptyStack(_) => "empty_stack",
        GameError::ChipLimit(_) => "chip_limit",
        GameError::InvalidName(_) => "invalid_name",
        GameError::DeckExhausted => "deck_exhausted",
        GameError::InvalidCard(_) => "invalid_card",
        GameError::InvalidConfig(_) => "invalid_config",
    }
}
