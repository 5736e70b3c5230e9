use crate::errors::ErrorResponse;
use riverboat_engine::engine::DeadlineToken;
use riverboat_engine::events::TableEvent;
use riverboat_engine::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

// Bounded so a stalled consumer cannot grow memory; it is dropped instead.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type TableId = String;
pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

/// What presentation layers receive for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An engine event, forwarded as-is.
    Table {
        table_id: TableId,
        event: TableEvent,
    },
    /// The actor is on the clock until `deadline` (RFC3339).
    ActionPrompt {
        table_id: TableId,
        seat: PlayerId,
        call_need: u32,
        min_raise: u32,
        token: DeadlineToken,
        deadline: String,
    },
    Countdown {
        table_id: TableId,
        seat: PlayerId,
        token: DeadlineToken,
        remaining_secs: u64,
    },
    Error {
        table_id: TableId,
        error: ErrorResponse,
    },
}

impl GameEvent {
    pub fn table_id(&self) -> &str {
        match self {
            GameEvent::Table { table_id, .. }
            | GameEvent::ActionPrompt { table_id, .. }
            | GameEvent::Countdown { table_id, .. }
            | GameEvent::Error { table_id, .. } => table_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Table { event, .. } => event.kind(),
            GameEvent::ActionPrompt { .. } => "action_prompt",
            GameEvent::Countdown { .. } => "countdown",
            GameEvent::Error { .. } => "error",
        }
    }
}

pub struct EventSubscription {
    bus: EventBus,
    table_id: TableId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.table_id, self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<TableId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TableId, Vec<(usize, EventSender)>>> {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TableId, Vec<(usize, EventSender)>>> {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self, table_id: TableId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(table_id.clone());
        EventSubscription {
            bus: self.clone(),
            table_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, table_id: TableId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.write()
            .entry(table_id.clone())
            .or_default()
            .push((id, tx));

        tracing::info!(
            table_id = %table_id,
            subscriber_id = id,
            "subscribed to table events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, table_id: &str, event: GameEvent) {
        tracing::debug!(
            table_id = %table_id,
            event_type = event.kind(),
            "broadcasting table event"
        );

        let subscribers = self.read().get(table_id).cloned();
        let Some(list) = subscribers else {
            tracing::trace!(table_id = %table_id, "no subscribers for table");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    table_id = %table_id,
                    subscriber_id = id,
                    error = ?e,
                    "dropping subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(table_id, &failed);
        }
    }

    pub fn unsubscribe(&self, table_id: &str, subscriber_id: usize) {
        self.remove_subscribers(table_id, &[subscriber_id]);
    }

    pub fn drop_table(&self, table_id: &str) {
        self.write().remove(table_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, table_id: &str, ids: &[usize]) {
        let mut guard = self.write();
        if let Some(list) = guard.get_mut(table_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(table_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_event(table: &str, message: &str) -> GameEvent {
        GameEvent::Error {
            table_id: table.to_string(),
            error: ErrorResponse::new("test", message),
        }
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe("t".to_string());
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn broadcast_reaches_only_that_table() {
        let bus = EventBus::new();
        let mut sub1 = bus.subscribe("a".to_string());
        let mut sub2 = bus.subscribe("a".to_string());
        let mut other = bus.subscribe("b".to_string());

        bus.broadcast("a", error_event("a", "ping"));

        assert!(matches!(sub1.receiver.try_recv(), Ok(GameEvent::Error { .. })));
        assert!(matches!(sub2.receiver.try_recv(), Ok(GameEvent::Error { .. })));
        assert!(other.receiver.try_recv().is_err());
    }

    #[test]
    fn stale_receiver_is_pruned() {
        let bus = EventBus::new();
        let (id, rx) = bus.subscribe_raw("t".to_string());
        drop(rx);
        bus.broadcast("t", error_event("t", "gone"));
        assert_eq!(bus.subscriber_count(), 0);
        bus.unsubscribe("t", id);
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = GameEvent::Countdown {
            table_id: "t".to_string(),
            seat: PlayerId(2),
            token: DeadlineToken(4),
            remaining_secs: 30,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "countdown");
        assert_eq!(json["token"], 4);
        assert_eq!(event.table_id(), "t");

        let forwarded = GameEvent::Table {
            table_id: "t".to_string(),
            event: TableEvent::HoleCardsDealt { seat: PlayerId(1) },
        };
        assert_eq!(forwarded.kind(), "hole_cards_dealt");
    }
}
