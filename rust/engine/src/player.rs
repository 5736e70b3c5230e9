use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a seated player. Doubles as the seat identifier and as
/// the ledger key; its ordering decides who receives odd chips in a split.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a player asks to do on their turn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid when nothing is owed)
    Check,
    /// Match the current bet, or as much of it as the stack covers
    Call,
    /// Put in the call requirement plus this increment
    Raise(u32),
}

/// Longest display name accepted at the table.
pub const MAX_NAME_LEN: usize = 20;

/// A player's chair at the table.
///
/// `stack` is the only field that outlives a hand; everything else is reset by
/// [`Seat::reset_for_hand`]. All fields are always present, with zero meaning
/// "nothing yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    id: PlayerId,
    name: String,
    stack: u32,
    /// Chips put in on the current street, not yet flushed to the pot.
    street_bet: u32,
    /// Chips flushed to the pot over the whole hand.
    contribution: u32,
    hole: Option<[Card; 2]>,
    folded: bool,
    all_in: bool,
    timeouts: u32,
    leaving: bool,
}

impl Seat {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: u32) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            street_bet: 0,
            contribution: 0,
            hole: None,
            folded: false,
            all_in: false,
            timeouts: 0,
            leaving: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn street_bet(&self) -> u32 {
        self.street_bet
    }
    pub fn contribution(&self) -> u32 {
        self.contribution
    }
    /// Everything this seat has put in this hand, flushed or not.
    pub fn committed(&self) -> u32 {
        self.contribution + self.street_bet
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_all_in(&self) -> bool {
        self.all_in
    }
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }
    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    /// Not folded, not all-in, and still holding chips.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in && self.stack > 0
    }

    /// What this seat still owes to reach `current_bet`.
    pub fn call_need(&self, current_bet: u32) -> u32 {
        current_bet.saturating_sub(self.street_bet)
    }

    pub(crate) fn reset_for_hand(&mut self, hole: [Card; 2]) {
        self.street_bet = 0;
        self.contribution = 0;
        self.hole = Some(hole);
        self.folded = false;
        self.all_in = false;
    }

    pub(crate) fn clear_hand(&mut self) {
        self.street_bet = 0;
        self.contribution = 0;
        self.hole = None;
        self.folded = false;
        self.all_in = false;
    }

    /// Moves up to `amount` from the stack onto the street. Returns what was
    /// actually paid; a seat that empties its stack becomes all-in.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.street_bet += paid;
        if paid > 0 && self.stack == 0 {
            self.all_in = true;
        }
        paid
    }

    /// Street close: the street bet joins the contribution. Returns the amount
    /// that left the street.
    pub(crate) fn flush(&mut self) -> u32 {
        let moved = self.street_bet;
        self.contribution += moved;
        self.street_bet = 0;
        moved
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    /// Gives back everything committed this hand (abort path).
    pub(crate) fn refund(&mut self) -> u32 {
        let back = self.committed();
        self.stack += back;
        self.street_bet = 0;
        self.contribution = 0;
        back
    }

    pub(crate) fn record_timeout(&mut self, limit: u32) {
        self.timeouts += 1;
        if limit > 0 && self.timeouts >= limit {
            self.leaving = true;
        }
    }

    pub(crate) fn clear_timeouts(&mut self) {
        self.timeouts = 0;
    }
}
