use riverboat_engine::player::PlayerId;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Durable chip balances. The table reads a stack when a player sits down and
/// writes it back when they leave or a hand ends.
pub trait Ledger: Send + Sync + Debug {
    /// `None` for a player the ledger has never seen.
    fn load(&self, id: PlayerId) -> Result<Option<u32>, LedgerError>;

    fn save(&self, id: PlayerId, stack: u32) -> Result<(), LedgerError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger storage poisoned")]
    StoragePoisoned,
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// In-memory ledger for tests and the simulator
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: RwLock<HashMap<PlayerId, u32>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(balances: impl IntoIterator<Item = (PlayerId, u32)>) -> Self {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    pub fn balance(&self, id: PlayerId) -> Option<u32> {
        self.balances
            .read()
            .ok()
            .and_then(|guard| guard.get(&id).copied())
    }
}

impl Ledger for MemoryLedger {
    fn load(&self, id: PlayerId) -> Result<Option<u32>, LedgerError> {
        self.balances
            .read()
            .map(|guard| guard.get(&id).copied())
            .map_err(|_| LedgerError::StoragePoisoned)
    }

    fn save(&self, id: PlayerId, stack: u32) -> Result<(), LedgerError> {
        let mut guard = self
            .balances
            .write()
            .map_err(|_| LedgerError::StoragePoisoned)?;
        guard.insert(id, stack);
        Ok(())
    }
}
