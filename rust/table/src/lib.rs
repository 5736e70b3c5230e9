//! Async table runtime for the riverboat engine.
//!
//! The engine's [`Table`](riverboat_engine::game::Table) is pure and
//! synchronous. This crate puts one behind a [`TableController`] that
//! serialises access, runs the turn timer, drives street transitions,
//! persists stacks through a [`Ledger`] and publishes everything that happens
//! on an [`EventBus`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use riverboat_engine::player::{PlayerAction, PlayerId};
//! use riverboat_table::{EventBus, MemoryLedger, TableController, TableSettings};
//!
//! # async fn demo() -> Result<(), riverboat_table::TableError> {
//! let table = TableController::new(
//!     TableSettings::default(),
//!     Arc::new(MemoryLedger::new()),
//!     EventBus::new(),
//! )?;
//! let mut events = table.subscribe();
//! table.seat_player(PlayerId(1), "ana")?;
//! table.seat_player(PlayerId(2), "bo")?;
//! table.start_hand().await?;
//! table.apply_action(PlayerId(1), PlayerAction::Fold).await?;
//! while let Ok(event) = events.receiver.try_recv() {
//!     println!("{}", event.kind());
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod settings;
pub mod timer;

pub use controller::TableController;
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse, TableError};
pub use events::{EventBus, EventSubscription, GameEvent, TableId};
pub use ledger::{Ledger, LedgerError, MemoryLedger};
pub use settings::{SettingsError, TableSettings};
