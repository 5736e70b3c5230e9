use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::betting::{BettingRound, HandEndReason, RoundStatus, Settle};
use crate::cards::Card;
use crate::deck::Deck;
use crate::engine::{DeadlineToken, Hand};
use crate::errors::GameError;
use crate::events::TableEvent;
use crate::hand::evaluate;
use crate::logger::{format_hand_id, ActionRecord, HandRecord, PotAward, SeatResult, ShownHand, Street};
use crate::player::{PlayerAction, PlayerId, Seat, MAX_NAME_LEN};
use crate::pot::{build_side_pots, split_amount, Contribution, Pot};
use crate::rules::{validate_action, ValidatedAction};

/// Stakes and seating limits of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    pub min_seats: usize,
    pub max_seats: usize,
    /// Consecutive timeouts after which a seat is flagged as leaving; 0 never
    /// flags.
    pub max_consecutive_timeouts: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 10,
            big_blind: 20,
            min_seats: 2,
            max_seats: 10,
            max_consecutive_timeouts: 2,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(GameError::InvalidConfig("blinds must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if self.min_seats < 2 {
            return Err(GameError::InvalidConfig("a hand needs at least 2 seats".into()));
        }
        if self.max_seats < self.min_seats {
            return Err(GameError::InvalidConfig(format!(
                "max seats {} below min seats {}",
                self.max_seats, self.min_seats
            )));
        }
        Ok(())
    }
}

/// Result of a state-changing table operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub status: RoundStatus,
    /// Everything the operation caused, in order.
    pub events: Vec<TableEvent>,
}

/// How the pots were settled at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotDistribution {
    /// One entry per pot, main pot first. A pot nobody eligible could win is
    /// returned to its contributors, who are then listed as its winners.
    pub awards: Vec<PotAward>,
    pub shown: Vec<ShownHand>,
    /// Net chips credited per seat, ascending seat id.
    pub winnings: Vec<(PlayerId, u32)>,
    pub total: u32,
}

/// What [`Table::end_hand`] hands back to the lifecycle layer.
#[derive(Debug, Clone)]
pub struct HandEnd {
    pub hand_id: String,
    pub reason: HandEndReason,
    /// Stacks of every seat that played the hand, removed ones included.
    pub final_stacks: Vec<(PlayerId, u32)>,
    /// Seats dropped for an empty stack or the timeout policy.
    pub removed: Vec<Seat>,
    pub record: HandRecord,
}

impl HandEnd {
    pub fn event(&self) -> TableEvent {
        TableEvent::HandFinished {
            hand_id: self.hand_id.clone(),
            reason: self.reason,
            final_stacks: self.final_stacks.clone(),
        }
    }
}

/// Public, card-free view of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub stack: u32,
    pub street_bet: u32,
    pub committed: u32,
    pub folded: bool,
    pub all_in: bool,
    pub timeouts: u32,
    pub leaving: bool,
}

/// Snapshot of the table for presentation. Never contains hole cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub hand_id: Option<String>,
    pub street: Option<Street>,
    pub board: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    pub actor: Option<PlayerId>,
    pub dealer: Option<PlayerId>,
    pub small_blind: u32,
    pub big_blind: u32,
    pub seats: Vec<SeatView>,
    pub token: Option<DeadlineToken>,
    pub outcome: Option<HandEndReason>,
}

/// One poker table: the seats in turn order, the button, and the hand in
/// progress.
///
/// Every operation either applies completely or returns an error with the
/// table untouched; the only exception is deck exhaustion, which aborts the
/// hand (refunding all committed chips) before reporting
/// [`GameError::DeckExhausted`].
///
/// # Examples
///
/// ```
/// use riverboat_engine::betting::RoundStatus;
/// use riverboat_engine::game::{Table, TableConfig};
/// use riverboat_engine::player::{PlayerAction, PlayerId};
///
/// let mut table = Table::new(TableConfig::default()).unwrap();
/// table.sit(PlayerId(1), "ana", 1000).unwrap();
/// table.sit(PlayerId(2), "bo", 1000).unwrap();
///
/// let outcome = table.start_hand_seeded(7).unwrap();
/// // heads-up: the button posts the small blind and acts first
/// assert_eq!(outcome.status, RoundStatus::AwaitingAction(PlayerId(1)));
///
/// let outcome = table.apply_action(PlayerId(1), PlayerAction::Fold).unwrap();
/// assert!(matches!(outcome.status, RoundStatus::HandComplete(_)));
/// let end = table.end_hand().unwrap();
/// assert_eq!(end.final_stacks, vec![(PlayerId(1), 990), (PlayerId(2), 1010)]);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    config: TableConfig,
    seats: Vec<Seat>,
    dealer: Option<usize>,
    hand: Option<Hand>,
    hand_seq: u32,
    token_seq: u64,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            seats: Vec::with_capacity(config.max_seats),
            dealer: None,
            hand: None,
            hand_seq: 0,
            token_seq: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id() == id)
    }
    pub fn is_hand_in_progress(&self) -> bool {
        self.hand.is_some()
    }
    pub fn hand_id(&self) -> Option<&str> {
        self.hand.as_ref().map(|h| h.id.as_str())
    }
    pub fn street(&self) -> Option<Street> {
        self.hand.as_ref().map(|h| h.street)
    }
    pub fn board(&self) -> &[Card] {
        match &self.hand {
            Some(h) => &h.board,
            None => &[],
        }
    }
    /// Chips flushed off previous streets of the current hand.
    pub fn pot(&self) -> u32 {
        self.hand.as_ref().map_or(0, |h| h.pot)
    }
    pub fn current_bet(&self) -> u32 {
        self.hand.as_ref().map_or(0, |h| h.round.current_bet())
    }
    pub fn actor(&self) -> Option<PlayerId> {
        let idx = self.hand.as_ref()?.round.actor()?;
        self.seats.get(idx).map(Seat::id)
    }
    /// The token a timeout must carry to be honoured.
    pub fn live_token(&self) -> Option<DeadlineToken> {
        self.hand.as_ref()?.token
    }
    pub fn dealer(&self) -> Option<PlayerId> {
        self.seats.get(self.dealer?).map(Seat::id)
    }
    pub fn outcome(&self) -> Option<HandEndReason> {
        self.hand.as_ref()?.outcome
    }
    pub fn hole_cards(&self, id: PlayerId) -> Option<[Card; 2]> {
        self.seat(id)?.hole_cards()
    }
    pub fn deck_remaining(&self) -> Option<usize> {
        self.hand.as_ref().map(Hand::deck_remaining)
    }

    /// Stacks plus everything wagered in the current hand. Constant across
    /// every operation except seating changes.
    pub fn total_chips(&self) -> u64 {
        let seats: u64 = self
            .seats
            .iter()
            .map(|s| u64::from(s.stack()) + u64::from(s.street_bet()))
            .sum();
        seats + u64::from(self.pot())
    }

    /// The hand is live but fewer than two seats can still bet, so the
    /// remaining board is dealt without prompts.
    pub fn is_runout(&self) -> bool {
        match &self.hand {
            Some(h) if !h.is_complete() => self.seats.iter().filter(|s| s.can_act()).count() < 2,
            _ => false,
        }
    }

    /// Seats a player at the end of the turn order. The table never holds
    /// more than `u32::MAX` chips in total.
    pub fn sit(&mut self, id: PlayerId, name: &str, stack: u32) -> Result<(), GameError> {
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(GameError::InvalidName(name.to_string()));
        }
        if self.seat(id).is_some() {
            return Err(GameError::AlreadySeated(id));
        }
        if self.seats.len() >= self.config.max_seats {
            return Err(GameError::TableFull(self.config.max_seats));
        }
        if stack == 0 {
            return Err(GameError::EmptyStack(id));
        }
        // every pot, layer and payout is bounded by the chips on the table
        if self.total_chips() + u64::from(stack) > u64::from(u32::MAX) {
            return Err(GameError::ChipLimit(id));
        }
        self.seats.push(Seat::new(id, name, stack));
        Ok(())
    }

    /// Removes a seat between hands and returns it with its final stack.
    pub fn leave(&mut self, id: PlayerId) -> Result<Seat, GameError> {
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }
        let idx = self
            .seats
            .iter()
            .position(|s| s.id() == id)
            .ok_or(GameError::UnknownSeat(id))?;
        self.shift_dealer(&[idx]);
        Ok(self.seats.remove(idx))
    }

    /// Starts a hand from a deck shuffled with `rng`.
    pub fn start_hand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ActionOutcome, GameError> {
        self.begin(Deck::shuffled(rng), None)
    }

    /// Starts a hand from a ChaCha20 deck; the seed lands in the hand record.
    pub fn start_hand_seeded(&mut self, seed: u64) -> Result<ActionOutcome, GameError> {
        self.begin(Deck::new_with_seed(seed), Some(seed))
    }

    /// Starts a hand from a prepared deck. Each seat, in turn order, takes
    /// the next two cards from the top; the board follows.
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<ActionOutcome, GameError> {
        self.begin(deck, None)
    }

    fn begin(&mut self, deck: Deck, seed: Option<u64>) -> Result<ActionOutcome, GameError> {
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }
        let n = self.seats.len();
        if n < self.config.min_seats {
            return Err(GameError::NotEnoughPlayers {
                needed: self.config.min_seats,
                actual: n,
            });
        }
        if let Some(broke) = self.seats.iter().find(|s| s.stack() == 0) {
            return Err(GameError::EmptyStack(broke.id()));
        }

        let dealer = self.dealer.map_or(0, |d| (d + 1) % n);
        let date = Utc::now().format("%Y%m%d").to_string();
        let hand_id = format_hand_id(&date, self.hand_seq + 1);
        let mut hand = Hand::new(
            hand_id,
            seed,
            deck,
            self.seats[dealer].id(),
            self.config.big_blind,
        );
        // deal before any chip moves so a short deck leaves the table as it was
        let holes = (0..n)
            .map(|_| hand.deal_hole())
            .collect::<Result<Vec<_>, _>>()?;

        self.hand_seq += 1;
        self.dealer = Some(dealer);
        for (seat, hole) in self.seats.iter_mut().zip(holes) {
            seat.reset_for_hand(hole);
        }

        let (sb, bb) = if n == 2 {
            (dealer, (dealer + 1) % n)
        } else {
            ((dealer + 1) % n, (dealer + 2) % n)
        };
        let sb_paid = self.seats[sb].commit(self.config.small_blind);
        let bb_paid = self.seats[bb].commit(self.config.big_blind);
        let small = (self.seats[sb].id(), sb_paid);
        let big = (self.seats[bb].id(), bb_paid);
        hand.posted = vec![small, big];
        hand.round.set_current_bet(sb_paid.max(bb_paid));

        let mut events = vec![TableEvent::HandStarted {
            hand_id: hand.id.clone(),
            dealer: hand.dealer,
            small_blind: small,
            big_blind: big,
        }];
        events.extend(
            self.seats
                .iter()
                .map(|s| TableEvent::HoleCardsDealt { seat: s.id() }),
        );

        let status = settle(&mut hand, &mut self.seats, &mut self.token_seq, bb, &mut events);
        self.hand = Some(hand);
        Ok(ActionOutcome { status, events })
    }

    /// Applies a player's action.
    ///
    /// The seat is checked before anything changes, in this order: unknown,
    /// folded, all-in, out of turn. The action is then validated against the
    /// seat's stack and the street's bet.
    pub fn apply_action(
        &mut self,
        seat: PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, GameError> {
        self.act(seat, action, false)
    }

    /// Turn-timer expiry. Folds `seat` only when `token` is still the live
    /// token and `seat` is still the actor; anything else is a stale timeout
    /// and returns `None` without touching the table.
    pub fn on_timeout(&mut self, seat: PlayerId, token: DeadlineToken) -> Option<ActionOutcome> {
        let hand = self.hand.as_ref()?;
        if hand.is_complete() || hand.token != Some(token) {
            return None;
        }
        let actor = hand.round.actor()?;
        if self.seats.get(actor).map(Seat::id) != Some(seat) {
            return None;
        }
        self.act(seat, PlayerAction::Fold, true).ok()
    }

    fn act(
        &mut self,
        id: PlayerId,
        action: PlayerAction,
        auto: bool,
    ) -> Result<ActionOutcome, GameError> {
        let hand = self.hand.as_mut().ok_or(GameError::NoHandInProgress)?;
        if hand.is_complete() {
            return Err(GameError::HandAlreadyComplete);
        }
        let actor = hand.round.actor().ok_or(GameError::NoActionPending)?;
        let idx = self
            .seats
            .iter()
            .position(|s| s.id() == id)
            .ok_or(GameError::UnknownSeat(id))?;
        let seat = &self.seats[idx];
        if seat.is_folded() {
            return Err(GameError::PlayerAlreadyFolded(id));
        }
        if seat.is_all_in() {
            return Err(GameError::PlayerAllIn(id));
        }
        if idx != actor {
            return Err(GameError::NotPlayersTurn {
                expected: self.seats[actor].id(),
                actual: id,
            });
        }
        let va = validate_action(
            seat,
            hand.round.current_bet(),
            hand.round.min_raise(),
            action,
        )?;

        let seat = &mut self.seats[idx];
        match va {
            ValidatedAction::Fold => seat.fold(),
            ValidatedAction::Check => {}
            ValidatedAction::Call { pay } | ValidatedAction::Raise { pay, .. } => {
                seat.commit(pay);
            }
        }
        hand.round
            .record(seat, matches!(va, ValidatedAction::Raise { .. }));
        hand.actions.push(ActionRecord {
            seat: id,
            street: hand.street,
            action: va,
            amount: va.chips(),
            auto,
        });

        let mut events = vec![TableEvent::ActionTaken {
            seat: id,
            street: hand.street,
            action: va,
            auto,
        }];
        if auto {
            seat.record_timeout(self.config.max_consecutive_timeouts);
            events.push(TableEvent::AutoFolded {
                seat: id,
                consecutive_timeouts: seat.timeouts(),
                leaving: seat.is_leaving(),
            });
        } else {
            seat.clear_timeouts();
        }

        let status = settle(hand, &mut self.seats, &mut self.token_seq, idx, &mut events);
        Ok(ActionOutcome { status, events })
    }

    /// Moves past a completed street: flushes, reveals the next street's
    /// cards and prompts the first seat after the button. From the river this
    /// goes to showdown.
    ///
    /// When fewer than two seats can still bet the new street closes at once
    /// with [`RoundStatus::StreetComplete`], so the caller keeps advancing
    /// until the hand completes.
    ///
    /// # Errors
    ///
    /// - [`GameError::StreetNotComplete`] while an action is pending
    /// - [`GameError::DeckExhausted`] after the hand has been aborted
    pub fn advance_street(&mut self) -> Result<ActionOutcome, GameError> {
        let next = {
            let hand = self.hand.as_ref().ok_or(GameError::NoHandInProgress)?;
            if hand.is_complete() {
                return Err(GameError::HandAlreadyComplete);
            }
            if hand.round.actor().is_some() {
                return Err(GameError::StreetNotComplete);
            }
            hand.street.next().ok_or(GameError::HandAlreadyComplete)?
        };

        if next == Street::Showdown {
            let dist = self.resolve_showdown()?;
            return Ok(ActionOutcome {
                status: RoundStatus::HandComplete(HandEndReason::ShowdownReached),
                events: distribution_events(&dist),
            });
        }

        let hand = self.hand.as_mut().ok_or(GameError::NoHandInProgress)?;
        flush(hand, &mut self.seats);
        let cards = match hand.reveal(next) {
            Ok(cards) => cards,
            Err(e) => {
                self.abort_hand()?;
                return Err(e);
            }
        };
        let mut events = vec![TableEvent::StreetRevealed {
            street: next,
            cards,
            board: hand.board.clone(),
        }];

        let able = self.seats.iter().filter(|s| s.can_act()).count();
        let first = BettingRound::next_actor(&self.seats, self.dealer.unwrap_or(0));
        let status = match first {
            Some(i) if able >= 2 => {
                prompt(hand, &self.seats, &mut self.token_seq, i, &mut events);
                RoundStatus::AwaitingAction(self.seats[i].id())
            }
            _ => {
                events.push(TableEvent::StreetClosed {
                    street: next,
                    pot: hand.pot,
                });
                RoundStatus::StreetComplete
            }
        };
        Ok(ActionOutcome { status, events })
    }

    /// Evaluates every live seat, layers the contributions into pots and
    /// credits the winners of each pot, main pot first. Requires a closed
    /// street and a full board.
    pub fn resolve_showdown(&mut self) -> Result<PotDistribution, GameError> {
        let hand = self.hand.as_mut().ok_or(GameError::NoHandInProgress)?;
        if hand.is_complete() {
            return Err(GameError::HandAlreadyComplete);
        }
        if hand.round.actor().is_some() || hand.board.len() < 5 {
            return Err(GameError::StreetNotComplete);
        }
        flush(hand, &mut self.seats);
        hand.street = Street::Showdown;

        let b = &hand.board;
        let mut shown = Vec::new();
        for seat in self.seats.iter().filter(|s| !s.is_folded()) {
            let Some(hole) = seat.hole_cards() else {
                continue;
            };
            let rank = evaluate(&[hole[0], hole[1], b[0], b[1], b[2], b[3], b[4]]);
            shown.push(ShownHand {
                seat: seat.id(),
                cards: hole,
                rank,
            });
        }
        let ranks: BTreeMap<PlayerId, _> = shown.iter().map(|h| (h.seat, h.rank)).collect();

        let contributions: Vec<Contribution> = self
            .seats
            .iter()
            .map(|s| Contribution {
                seat: s.id(),
                amount: s.contribution(),
                folded: s.is_folded(),
            })
            .collect();

        let mut awards = Vec::new();
        let mut winnings: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for pot in build_side_pots(&contributions) {
            let best = pot.eligible.iter().filter_map(|id| ranks.get(id)).max();
            let winners: Vec<PlayerId> = match best {
                Some(best) => pot
                    .eligible
                    .iter()
                    .filter(|&&id| ranks.get(&id) == Some(best))
                    .copied()
                    .collect(),
                None => pot.contributors.clone(),
            };
            let shares = split_amount(pot.amount, &winners);
            for (&id, &amount) in &shares {
                *winnings.entry(id).or_default() += amount;
            }
            awards.push(PotAward {
                pot,
                winners,
                shares: shares.into_iter().collect(),
            });
        }

        for seat in self.seats.iter_mut() {
            if let Some(&amount) = winnings.get(&seat.id()) {
                seat.credit(amount);
            }
        }
        let total: u32 = winnings.values().sum();
        hand.pot = 0;
        hand.awards = awards.clone();
        hand.shown = shown.clone();
        hand.won = winnings.clone();
        hand.outcome = Some(HandEndReason::ShowdownReached);

        Ok(PotDistribution {
            awards,
            shown,
            winnings: winnings.into_iter().collect(),
            total,
        })
    }

    /// Ends the hand in place, refunding every seat's committed chips.
    pub fn abort_hand(&mut self) -> Result<ActionOutcome, GameError> {
        let hand = self.hand.as_mut().ok_or(GameError::NoHandInProgress)?;
        if hand.is_complete() {
            return Err(GameError::HandAlreadyComplete);
        }
        let refunds: Vec<(PlayerId, u32)> = self
            .seats
            .iter_mut()
            .map(|s| (s.id(), s.refund()))
            .filter(|&(_, back)| back > 0)
            .collect();
        hand.pot = 0;
        hand.round.reset_street();
        hand.token = None;
        hand.outcome = Some(HandEndReason::Aborted);
        Ok(ActionOutcome {
            status: RoundStatus::HandComplete(HandEndReason::Aborted),
            events: vec![TableEvent::HandAborted { refunds }],
        })
    }

    /// Tears down a completed hand: builds its record, clears hand-scoped
    /// seat state and drops broke or leaving seats.
    pub fn end_hand(&mut self) -> Result<HandEnd, GameError> {
        let reason = match &self.hand {
            None => return Err(GameError::NoHandInProgress),
            Some(h) => h.outcome.ok_or(GameError::HandNotComplete)?,
        };
        let Some(hand) = self.hand.take() else {
            return Err(GameError::NoHandInProgress);
        };

        let results: Vec<SeatResult> = self
            .seats
            .iter()
            .map(|s| SeatResult {
                seat: s.id(),
                committed: s.committed(),
                won: hand.won.get(&s.id()).copied().unwrap_or(0),
                final_stack: s.stack(),
            })
            .collect();
        let final_stacks: Vec<(PlayerId, u32)> =
            self.seats.iter().map(|s| (s.id(), s.stack())).collect();
        let record = HandRecord {
            hand_id: hand.id.clone(),
            seed: hand.seed,
            dealer: hand.dealer,
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            posted: hand.posted,
            actions: hand.actions,
            board: hand.board,
            awards: hand.awards,
            showdown: hand.shown,
            results,
            result: Some(reason_label(reason).to_string()),
            ts: None,
            meta: None,
        };

        for seat in self.seats.iter_mut() {
            seat.clear_hand();
        }
        let gone: Vec<usize> = self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.stack() == 0 || s.is_leaving())
            .map(|(i, _)| i)
            .collect();
        self.shift_dealer(&gone);
        let mut removed = Vec::with_capacity(gone.len());
        for &i in gone.iter().rev() {
            removed.push(self.seats.remove(i));
        }
        removed.reverse();

        Ok(HandEnd {
            hand_id: hand.id,
            reason,
            final_stacks,
            removed,
            record,
        })
    }

    /// Keeps the button on the seat before the removed ones so the next
    /// rotation lands on the seat that would have followed.
    fn shift_dealer(&mut self, removed: &[usize]) {
        if let Some(d) = self.dealer {
            let shift = removed.iter().filter(|&&i| i <= d).count();
            self.dealer = (d + 1).checked_sub(shift).and_then(|k| k.checked_sub(1));
        }
    }

    pub fn view(&self) -> TableView {
        let hand = self.hand.as_ref();
        TableView {
            hand_id: hand.map(|h| h.id.clone()),
            street: self.street(),
            board: self.board().to_vec(),
            pot: self.pot(),
            current_bet: self.current_bet(),
            actor: self.actor(),
            dealer: self.dealer(),
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            seats: self
                .seats
                .iter()
                .map(|s| SeatView {
                    id: s.id(),
                    name: s.name().to_string(),
                    stack: s.stack(),
                    street_bet: s.street_bet(),
                    committed: s.committed(),
                    folded: s.is_folded(),
                    all_in: s.is_all_in(),
                    timeouts: s.timeouts(),
                    leaving: s.is_leaving(),
                })
                .collect(),
            token: self.live_token(),
            outcome: self.outcome(),
        }
    }
}

pub fn reason_label(reason: HandEndReason) -> &'static str {
    match reason {
        HandEndReason::AllButOneFolded => "all_but_one_folded",
        HandEndReason::ShowdownReached => "showdown",
        HandEndReason::Aborted => "aborted",
    }
}

fn flush(hand: &mut Hand, seats: &mut [Seat]) {
    hand.pot += seats.iter_mut().map(Seat::flush).sum::<u32>();
    hand.round.reset_street();
    hand.token = None;
}

fn prompt(
    hand: &mut Hand,
    seats: &[Seat],
    token_seq: &mut u64,
    idx: usize,
    events: &mut Vec<TableEvent>,
) {
    *token_seq += 1;
    let token = DeadlineToken(*token_seq);
    hand.round.set_actor(Some(idx));
    hand.token = Some(token);
    events.push(TableEvent::ActionPrompt {
        seat: seats[idx].id(),
        call_need: seats[idx].call_need(hand.round.current_bet()),
        min_raise: hand.round.min_raise(),
        token,
    });
}

/// Turns the round's verdict into table state after the seat at `from` acted
/// (or, at hand start, after the blinds were posted).
fn settle(
    hand: &mut Hand,
    seats: &mut [Seat],
    token_seq: &mut u64,
    from: usize,
    events: &mut Vec<TableEvent>,
) -> RoundStatus {
    match hand.round.settle(seats, from) {
        Settle::Uncontested(winner) => {
            award_uncontested(hand, seats, winner, events);
            RoundStatus::HandComplete(HandEndReason::AllButOneFolded)
        }
        Settle::StreetComplete => {
            let street = hand.street;
            flush(hand, seats);
            events.push(TableEvent::StreetClosed {
                street,
                pot: hand.pot,
            });
            RoundStatus::StreetComplete
        }
        Settle::Next(i) => {
            prompt(hand, seats, token_seq, i, events);
            RoundStatus::AwaitingAction(seats[i].id())
        }
    }
}

fn award_uncontested(
    hand: &mut Hand,
    seats: &mut [Seat],
    winner: PlayerId,
    events: &mut Vec<TableEvent>,
) {
    flush(hand, seats);
    let amount = hand.pot;
    hand.pot = 0;
    if let Some(seat) = seats.iter_mut().find(|s| s.id() == winner) {
        seat.credit(amount);
    }
    *hand.won.entry(winner).or_default() += amount;

    let mut contributors: Vec<PlayerId> = seats
        .iter()
        .filter(|s| s.contribution() > 0)
        .map(Seat::id)
        .collect();
    contributors.sort_unstable();
    let cap = seats.iter().map(Seat::contribution).max().unwrap_or(0);
    hand.awards.push(PotAward {
        pot: Pot {
            cap,
            amount,
            contributors,
            eligible: vec![winner],
        },
        winners: vec![winner],
        shares: vec![(winner, amount)],
    });
    hand.outcome = Some(HandEndReason::AllButOneFolded);
    events.push(TableEvent::PotAwarded {
        index: 0,
        amount,
        winners: vec![winner],
        shares: vec![(winner, amount)],
    });
}

fn distribution_events(dist: &PotDistribution) -> Vec<TableEvent> {
    let mut events = vec![TableEvent::ShowdownSummary {
        hands: dist.shown.clone(),
    }];
    events.extend(dist.awards.iter().enumerate().map(|(index, a)| {
        TableEvent::PotAwarded {
            index,
            amount: a.pot.amount,
            winners: a.winners.clone(),
            shares: a.shares.clone(),
        }
    }));
    events
}
