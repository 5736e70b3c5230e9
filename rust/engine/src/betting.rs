use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::player::{PlayerId, Seat};

/// Why a hand stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandEndReason {
    /// Everyone else folded; the pot went to the last seat without evaluation.
    AllButOneFolded,
    /// Cards were compared and the pots distributed.
    ShowdownReached,
    /// Ended early with every committed chip refunded.
    Aborted,
}

/// Where the betting state machine stands after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RoundStatus {
    /// The named seat must act next.
    AwaitingAction(PlayerId),
    /// Betting on this street is over; the next street (or showdown) is due.
    StreetComplete,
    HandComplete(HandEndReason),
}

/// What the round decided after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Only this seat still holds cards.
    Uncontested(PlayerId),
    StreetComplete,
    /// Index into the turn order of the next actor.
    Next(usize),
}

/// Per-street betting bookkeeping over the table's turn order.
///
/// The round never owns seats; every predicate takes the seat slice so the
/// table stays the single owner of chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRound {
    current_bet: u32,
    min_raise: u32,
    acted: BTreeSet<PlayerId>,
    actor: Option<usize>,
}

impl BettingRound {
    pub fn new(min_raise: u32) -> Self {
        Self {
            current_bet: 0,
            min_raise,
            acted: BTreeSet::new(),
            actor: None,
        }
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }
    pub fn actor(&self) -> Option<usize> {
        self.actor
    }
    pub fn has_acted(&self, seat: PlayerId) -> bool {
        self.acted.contains(&seat)
    }

    pub(crate) fn set_current_bet(&mut self, bet: u32) {
        self.current_bet = bet;
    }

    pub(crate) fn set_actor(&mut self, actor: Option<usize>) {
        self.actor = actor;
    }

    /// Every seat still in the betting has acted and matched the current bet.
    pub fn ready_to_advance(&self, seats: &[Seat]) -> bool {
        seats
            .iter()
            .filter(|s| !s.is_folded() && !s.is_all_in())
            .all(|s| self.acted.contains(&s.id()) && s.street_bet() == self.current_bet)
    }

    /// First seat after `from` (cyclically, `from` itself last) that can act.
    pub fn next_actor(seats: &[Seat], from: usize) -> Option<usize> {
        let n = seats.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| seats[i].can_act())
    }

    /// Books an applied action. A raise lifts the target to the raiser's
    /// street bet and reopens the action for everybody else.
    pub(crate) fn record(&mut self, seat: &Seat, raised: bool) {
        if raised {
            self.current_bet = seat.street_bet();
            self.acted.clear();
        }
        self.acted.insert(seat.id());
    }

    /// Decides what follows the last action taken by the seat at `from`.
    pub(crate) fn settle(&self, seats: &[Seat], from: usize) -> Settle {
        let mut live = seats.iter().filter(|s| !s.is_folded());
        if let (Some(last), None) = (live.next(), live.next()) {
            return Settle::Uncontested(last.id());
        }

        if self.ready_to_advance(seats) {
            return Settle::StreetComplete;
        }
        let mut able = seats.iter().filter(|s| s.can_act());
        match (able.next(), able.next()) {
            (None, _) => return Settle::StreetComplete,
            (Some(only), None) if only.call_need(self.current_bet) == 0 => {
                return Settle::StreetComplete
            }
            _ => {}
        }
        match Self::next_actor(seats, from) {
            Some(i) => Settle::Next(i),
            None => Settle::StreetComplete,
        }
    }

    /// Street close: forget the target, the acted set and the actor.
    pub(crate) fn reset_street(&mut self) {
        self.current_bet = 0;
        self.acted.clear();
        self.actor = None;
    }
}
