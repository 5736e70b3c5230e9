use riverboat_engine::game::TableConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Runtime settings of one table: stakes, seat limits and timer pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Seconds an actor has before being auto-folded
    pub turn_timeout_secs: u64,
    /// Seconds between countdown events while a seat is on the clock
    pub countdown_interval_secs: u64,
    /// Pause between board reveals when nobody can bet any more
    pub runout_delay_ms: u64,
    pub min_seats: usize,
    pub max_seats: usize,
    /// Consecutive timeouts before a seat is flagged to leave; 0 disables
    pub max_consecutive_timeouts: u32,
    /// Stack given to players the ledger has never seen
    pub starting_stack: u32,
    /// Seed for the table's shuffle source; random when absent
    pub seed: Option<u64>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            small_blind: 10,
            big_blind: 20,
            turn_timeout_secs: 120,
            countdown_interval_secs: 10,
            runout_delay_ms: 1000,
            min_seats: 2,
            max_seats: 10,
            max_consecutive_timeouts: 2,
            starting_stack: 1000,
            seed: None,
        }
    }
}

impl TableSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(SettingsError::InvalidValue(
                "blinds must be greater than 0".to_string(),
            ));
        }
        if self.small_blind > self.big_blind {
            return Err(SettingsError::InvalidValue(
                "small_blind cannot exceed big_blind".to_string(),
            ));
        }
        if self.min_seats < 2 {
            return Err(SettingsError::InvalidValue(
                "min_seats must be at least 2".to_string(),
            ));
        }
        if self.max_seats < self.min_seats {
            return Err(SettingsError::InvalidValue(
                "max_seats cannot be below min_seats".to_string(),
            ));
        }
        if self.turn_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "turn_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.starting_stack == 0 {
            return Err(SettingsError::InvalidValue(
                "starting_stack must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The engine half of the settings.
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            min_seats: self.min_seats,
            max_seats: self.max_seats,
            max_consecutive_timeouts: self.max_consecutive_timeouts,
        }
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Countdown period; zero disables countdown events.
    pub fn countdown_interval(&self) -> Duration {
        Duration::from_secs(self.countdown_interval_secs)
    }

    pub fn runout_delay(&self) -> Duration {
        Duration::from_millis(self.runout_delay_ms)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
