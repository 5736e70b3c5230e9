//! The async face of one table.
//!
//! A [`TableController`] owns the engine [`Table`] behind a mutex, so exactly
//! one mutation runs at a time. Every mutation publishes its events on the
//! [`EventBus`], cancels the outstanding turn timer and, when action moves
//! to a seat, arms a new one keyed by the table's live [`DeadlineToken`].
//! Street transitions are driven here. A hand where nobody can bet any more is
//! run out by a spawned task with a pause between reveals, so it finishes even
//! when the caller that triggered it goes away.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::task::JoinHandle;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use riverboat_engine::betting::RoundStatus;
use riverboat_engine::cards::Card;
use riverboat_engine::engine::DeadlineToken;
use riverboat_engine::errors::GameError;
use riverboat_engine::events::TableEvent;
use riverboat_engine::game::{ActionOutcome, HandEnd, Table, TableView};
use riverboat_engine::player::{PlayerAction, PlayerId};
use uuid::Uuid;

use crate::errors::{IntoErrorResponse, TableError};
use crate::events::{EventBus, EventSubscription, GameEvent, TableId};
use crate::ledger::Ledger;
use crate::settings::TableSettings;
use crate::timer::TimerHandle;

#[derive(Debug, Clone)]
pub struct TableController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    id: TableId,
    settings: TableSettings,
    ledger: Arc<dyn Ledger>,
    bus: EventBus,
    slot: Mutex<Slot>,
}

#[derive(Debug)]
struct Slot {
    table: Table,
    timer: Option<TimerHandle>,
    runout: Option<JoinHandle<()>>,
    rng: ChaCha20Rng,
    last_hand: Option<HandEnd>,
}

impl TableController {
    pub fn new(
        settings: TableSettings,
        ledger: Arc<dyn Ledger>,
        bus: EventBus,
    ) -> Result<Self, TableError> {
        settings.validate()?;
        let table = Table::new(settings.table_config())?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            table_id = %id,
            small_blind = settings.small_blind,
            big_blind = settings.big_blind,
            "table created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                id,
                settings,
                ledger,
                bus,
                slot: Mutex::new(Slot {
                    table,
                    timer: None,
                    runout: None,
                    rng: ChaCha20Rng::seed_from_u64(seed),
                    last_hand: None,
                }),
            }),
        })
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn settings(&self) -> &TableSettings {
        &self.inner.settings
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.inner.bus.subscribe(self.inner.id.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>, TableError> {
        self.inner
            .slot
            .lock()
            .map_err(|_| TableError::StoragePoisoned)
    }

    /// Seats a player with the stack the ledger holds for them, or the
    /// starting stack when the ledger has never seen them.
    pub fn seat_player(&self, id: PlayerId, name: &str) -> Result<u32, TableError> {
        let stack = self
            .inner
            .ledger
            .load(id)?
            .unwrap_or(self.inner.settings.starting_stack);
        let mut slot = self.lock()?;
        slot.table.sit(id, name, stack)?;

        tracing::info!(
            table_id = %self.inner.id,
            seat = %id,
            stack,
            "player seated"
        );
        Ok(stack)
    }

    /// Removes a player between hands and writes their stack back.
    pub fn leave(&self, id: PlayerId) -> Result<u32, TableError> {
        let seat = {
            let mut slot = self.lock()?;
            slot.table.leave(id)?
        };
        self.inner.ledger.save(id, seat.stack())?;

        tracing::info!(
            table_id = %self.inner.id,
            seat = %id,
            stack = seat.stack(),
            "player left"
        );
        Ok(seat.stack())
    }

    pub async fn start_hand(&self) -> Result<ActionOutcome, TableError> {
        let outcome = {
            let mut guard = self.lock()?;
            let slot = &mut *guard;
            let outcome = slot.table.start_hand(&mut slot.rng)?;
            tracing::info!(
                table_id = %self.inner.id,
                hand_id = slot.table.hand_id().unwrap_or_default(),
                seats = slot.table.seats().len(),
                "hand started"
            );
            let status = self.publish(slot, &outcome);
            self.settle(slot, status);
            outcome
        };
        Ok(outcome)
    }

    /// Applies a player's action. A rejected action changes nothing, the
    /// running timer included.
    pub async fn apply_action(
        &self,
        seat: PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, TableError> {
        let outcome = {
            let mut slot = self.lock()?;
            match slot.table.apply_action(seat, action) {
                Ok(outcome) => {
                    tracing::debug!(
                        table_id = %self.inner.id,
                        seat = %seat,
                        action = ?action,
                        "action applied"
                    );
                    let status = self.publish(&mut slot, &outcome);
                    self.settle(&mut slot, status);
                    outcome
                }
                Err(e) => {
                    let err = TableError::from(e);
                    err.log_error(&self.inner.id);
                    return Err(err);
                }
            }
        };
        Ok(outcome)
    }

    /// Timeout delivered from outside the timer. `None` when the token is
    /// stale or the seat is no longer the actor.
    pub async fn on_timeout(
        &self,
        seat: PlayerId,
        token: DeadlineToken,
    ) -> Result<Option<ActionOutcome>, TableError> {
        self.timeout(seat, token, false).await
    }

    async fn expire(&self, seat: PlayerId, token: DeadlineToken) {
        if let Err(e) = self.timeout(seat, token, true).await {
            e.log_error(&self.inner.id);
        }
    }

    async fn timeout(
        &self,
        seat: PlayerId,
        token: DeadlineToken,
        from_timer: bool,
    ) -> Result<Option<ActionOutcome>, TableError> {
        let outcome = {
            let mut slot = self.lock()?;
            let Some(outcome) = slot.table.on_timeout(seat, token) else {
                tracing::debug!(
                    table_id = %self.inner.id,
                    seat = %seat,
                    token = token.0,
                    "stale timeout ignored"
                );
                return Ok(None);
            };
            // the expiring timer is this task; let it finish instead of
            // aborting it under its own feet
            if from_timer && slot.timer.as_ref().map(TimerHandle::token) == Some(token) {
                slot.timer = None;
            }
            tracing::info!(
                table_id = %self.inner.id,
                seat = %seat,
                token = token.0,
                "turn timed out"
            );
            let status = self.publish(&mut slot, &outcome);
            self.settle(&mut slot, status);
            outcome
        };
        Ok(Some(outcome))
    }

    /// Ends the current hand and refunds every committed chip.
    pub async fn abort_hand(&self) -> Result<ActionOutcome, TableError> {
        let mut slot = self.lock()?;
        let outcome = slot.table.abort_hand()?;
        tracing::warn!(
            table_id = %self.inner.id,
            hand_id = slot.table.hand_id().unwrap_or_default(),
            "hand aborted"
        );
        self.publish(&mut slot, &outcome);
        Ok(outcome)
    }

    pub fn snapshot(&self) -> Result<TableView, TableError> {
        Ok(self.lock()?.table.view())
    }

    pub fn hole_cards(&self, id: PlayerId) -> Result<Option<[Card; 2]>, TableError> {
        Ok(self.lock()?.table.hole_cards(id))
    }

    /// The seat on the clock and the token its timer carries.
    pub fn armed_timer(&self) -> Result<Option<(PlayerId, DeadlineToken)>, TableError> {
        Ok(self
            .lock()?
            .timer
            .as_ref()
            .map(|t| (t.seat(), t.token())))
    }

    /// Summary of the most recently finished hand.
    pub fn last_hand(&self) -> Result<Option<HandEnd>, TableError> {
        Ok(self.lock()?.last_hand.clone())
    }

    /// Deals streets until someone must act or the hand ends. Once nobody can
    /// bet the rest of the board is handed to a paced runout task.
    fn settle(&self, slot: &mut Slot, mut status: RoundStatus) {
        let delay = self.inner.settings.runout_delay();
        while status == RoundStatus::StreetComplete {
            if slot.table.is_runout() && !delay.is_zero() {
                if let Some(hand_id) = slot.table.hand_id() {
                    slot.runout = Some(self.schedule_runout(hand_id.to_string()));
                }
                return;
            }
            match self.advance(slot) {
                Some(next) => status = next,
                None => return,
            }
        }
    }

    /// Reveals the next street after `runout_delay`, then settles again.
    fn schedule_runout(&self, hand_id: String) -> JoinHandle<()> {
        let delay = self.inner.settings.runout_delay();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = TableController { inner };
            let mut slot = match controller.lock() {
                Ok(slot) => slot,
                Err(e) => {
                    e.log_error(&controller.inner.id);
                    return;
                }
            };
            // this task is the stored handle; drop it before a successor lands
            slot.runout = None;
            if slot.table.hand_id() != Some(hand_id.as_str()) || slot.table.outcome().is_some() {
                return;
            }
            if let Some(status) = controller.advance(&mut slot) {
                controller.settle(&mut slot, status);
            }
        })
    }

    /// One street transition. `None` when the hand can no longer advance.
    fn advance(&self, slot: &mut Slot) -> Option<RoundStatus> {
        match slot.table.advance_street() {
            Ok(outcome) => Some(self.publish(slot, &outcome)),
            Err(GameError::DeckExhausted) => {
                let err = TableError::from(GameError::DeckExhausted);
                let response = err.log_error(&self.inner.id);
                self.inner.bus.broadcast(
                    &self.inner.id,
                    GameEvent::Error {
                        table_id: self.inner.id.clone(),
                        error: response,
                    },
                );
                self.finish_hand(slot);
                None
            }
            Err(
                GameError::StreetNotComplete
                | GameError::HandAlreadyComplete
                | GameError::NoHandInProgress,
            ) => None,
            Err(e) => {
                TableError::from(e).log_error(&self.inner.id);
                None
            }
        }
    }

    /// Broadcasts an outcome's events, replaces the turn timer and closes the
    /// hand when it is over. Must run under the same lock as the mutation.
    fn publish(&self, slot: &mut Slot, outcome: &ActionOutcome) -> RoundStatus {
        if let Some(timer) = slot.timer.take() {
            timer.cancel();
        }

        let settings = &self.inner.settings;
        for event in &outcome.events {
            let event = match event {
                TableEvent::ActionPrompt {
                    seat,
                    call_need,
                    min_raise,
                    token,
                } => {
                    let deadline = chrono::Duration::from_std(settings.turn_timeout())
                        .ok()
                        .and_then(|d| chrono::Utc::now().checked_add_signed(d))
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_default();
                    GameEvent::ActionPrompt {
                        table_id: self.inner.id.clone(),
                        seat: *seat,
                        call_need: *call_need,
                        min_raise: *min_raise,
                        token: *token,
                        deadline,
                    }
                }
                TableEvent::AutoFolded {
                    seat,
                    consecutive_timeouts,
                    leaving,
                } => {
                    tracing::info!(
                        table_id = %self.inner.id,
                        seat = %seat,
                        consecutive_timeouts,
                        leaving,
                        "seat auto-folded"
                    );
                    self.table_event(event.clone())
                }
                other => self.table_event(other.clone()),
            };
            self.inner.bus.broadcast(&self.inner.id, event);
        }

        match outcome.status {
            RoundStatus::AwaitingAction(seat) => {
                if let Some(token) = slot.table.live_token() {
                    slot.timer = Some(self.arm(seat, token));
                }
            }
            RoundStatus::HandComplete(_) => self.finish_hand(slot),
            RoundStatus::StreetComplete => {}
        }
        outcome.status
    }

    fn table_event(&self, event: TableEvent) -> GameEvent {
        GameEvent::Table {
            table_id: self.inner.id.clone(),
            event,
        }
    }

    fn arm(&self, seat: PlayerId, token: DeadlineToken) -> TimerHandle {
        let settings = &self.inner.settings;
        let bus = self.inner.bus.clone();
        let table_id = self.inner.id.clone();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        tracing::debug!(
            table_id = %table_id,
            seat = %seat,
            token = token.0,
            timeout_secs = settings.turn_timeout_secs,
            "turn timer armed"
        );

        TimerHandle::spawn(
            seat,
            token,
            settings.turn_timeout(),
            settings.countdown_interval(),
            move |remaining_secs| {
                bus.broadcast(
                    &table_id,
                    GameEvent::Countdown {
                        table_id: table_id.clone(),
                        seat,
                        token,
                        remaining_secs,
                    },
                )
            },
            async move {
                if let Some(inner) = weak.upgrade() {
                    TableController { inner }.expire(seat, token).await;
                }
            },
        )
    }

    /// Tears down a completed hand and persists every stack.
    fn finish_hand(&self, slot: &mut Slot) {
        if let Some(timer) = slot.timer.take() {
            timer.cancel();
        }
        if let Some(runout) = slot.runout.take() {
            runout.abort();
        }
        let end = match slot.table.end_hand() {
            Ok(end) => end,
            Err(e) => {
                TableError::from(e).log_error(&self.inner.id);
                return;
            }
        };

        for &(id, stack) in &end.final_stacks {
            if let Err(e) = self.inner.ledger.save(id, stack) {
                let response = TableError::from(e).log_error(&self.inner.id);
                self.inner.bus.broadcast(
                    &self.inner.id,
                    GameEvent::Error {
                        table_id: self.inner.id.clone(),
                        error: response,
                    },
                );
            }
        }
        for seat in &end.removed {
            tracing::info!(
                table_id = %self.inner.id,
                seat = %seat.id(),
                stack = seat.stack(),
                leaving = seat.is_leaving(),
                "seat removed"
            );
        }
        tracing::info!(
            table_id = %self.inner.id,
            hand_id = %end.hand_id,
            reason = ?end.reason,
            "hand finished"
        );

        self.inner
            .bus
            .broadcast(&self.inner.id, self.table_event(end.event()));
        slot.last_hand = Some(end);
    }
}
