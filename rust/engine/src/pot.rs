//! Side-pot construction and integer-exact pot splitting.
//!
//! Both functions are pure: they read contributions and return new values,
//! so showdown can call them without touching table state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// One seat's lifetime stake in the hand, as seen by the pot builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub seat: PlayerId,
    pub amount: u32,
    pub folded: bool,
}

/// A main or side pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    /// Contribution level that closes this pot.
    pub cap: u32,
    pub amount: u32,
    /// Every seat that put chips into this layer, folded or not.
    pub contributors: Vec<PlayerId>,
    /// Contributors still holding cards; only they can win the pot.
    pub eligible: Vec<PlayerId>,
}

/// Layers contributions into pots, main pot first.
///
/// For each distinct positive contribution level `cap` (ascending, with `prev`
/// the level before it), every seat that reached `cap` puts `cap - prev` into
/// that layer. Folded seats pay into layers but are never eligible.
///
/// ```
/// use riverboat_engine::player::PlayerId;
/// use riverboat_engine::pot::{build_side_pots, Contribution};
///
/// let pots = build_side_pots(&[
///     Contribution { seat: PlayerId(1), amount: 500, folded: false },
///     Contribution { seat: PlayerId(2), amount: 500, folded: false },
///     Contribution { seat: PlayerId(3), amount: 20, folded: true },
/// ]);
/// assert_eq!(pots.len(), 2);
/// assert_eq!((pots[0].amount, pots[1].amount), (60, 960));
/// ```
pub fn build_side_pots(contributions: &[Contribution]) -> Vec<Pot> {
    let levels: BTreeSet<u32> = contributions
        .iter()
        .map(|c| c.amount)
        .filter(|&a| a > 0)
        .collect();

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev = 0u32;
    for cap in levels {
        let members: Vec<&Contribution> =
            contributions.iter().filter(|c| c.amount >= cap).collect();
        let mut contributors: Vec<PlayerId> = members.iter().map(|c| c.seat).collect();
        let mut eligible: Vec<PlayerId> = members
            .iter()
            .filter(|c| !c.folded)
            .map(|c| c.seat)
            .collect();
        contributors.sort_unstable();
        eligible.sort_unstable();
        pots.push(Pot {
            cap,
            amount: (cap - prev) * members.len() as u32,
            contributors,
            eligible,
        });
        prev = cap;
    }
    pots
}

/// Splits `amount` evenly between `winners`; the remainder goes one chip at a
/// time to the lowest seat ids. The shares always sum to `amount`.
///
/// ```
/// use riverboat_engine::player::PlayerId;
/// use riverboat_engine::pot::split_amount;
///
/// let shares = split_amount(7, &[PlayerId(3), PlayerId(1), PlayerId(2)]);
/// assert_eq!(shares[&PlayerId(1)], 3);
/// assert_eq!(shares[&PlayerId(2)], 2);
/// assert_eq!(shares[&PlayerId(3)], 2);
/// ```
pub fn split_amount(amount: u32, winners: &[PlayerId]) -> BTreeMap<PlayerId, u32> {
    let order: BTreeSet<PlayerId> = winners.iter().copied().collect();
    if order.is_empty() {
        return BTreeMap::new();
    }
    let n = order.len() as u32;
    let base = amount / n;
    let remainder = (amount % n) as usize;
    order
        .into_iter()
        .enumerate()
        .map(|(i, seat)| (seat, base + u32::from(i < remainder)))
        .collect()
}
