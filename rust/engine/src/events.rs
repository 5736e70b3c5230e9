use serde::{Deserialize, Serialize};

use crate::betting::HandEndReason;
use crate::cards::Card;
use crate::engine::DeadlineToken;
use crate::logger::{ShownHand, Street};
use crate::player::PlayerId;
use crate::rules::ValidatedAction;

/// Structured notifications produced by table operations, in the order they
/// happened. They carry no private information: hole cards are only ever
/// announced as dealt, never shown, until showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    HandStarted {
        hand_id: String,
        dealer: PlayerId,
        /// Blinds as posted: `(seat, amount)`.
        small_blind: (PlayerId, u32),
        big_blind: (PlayerId, u32),
    },
    HoleCardsDealt {
        seat: PlayerId,
    },
    ActionTaken {
        seat: PlayerId,
        street: Street,
        action: ValidatedAction,
        auto: bool,
    },
    AutoFolded {
        seat: PlayerId,
        consecutive_timeouts: u32,
        leaving: bool,
    },
    ActionPrompt {
        seat: PlayerId,
        call_need: u32,
        min_raise: u32,
        token: DeadlineToken,
    },
    StreetClosed {
        street: Street,
        pot: u32,
    },
    StreetRevealed {
        street: Street,
        cards: Vec<Card>,
        board: Vec<Card>,
    },
    ShowdownSummary {
        hands: Vec<ShownHand>,
    },
    PotAwarded {
        /// 0 is the main pot.
        index: usize,
        amount: u32,
        winners: Vec<PlayerId>,
        shares: Vec<(PlayerId, u32)>,
    },
    HandAborted {
        refunds: Vec<(PlayerId, u32)>,
    },
    HandFinished {
        hand_id: String,
        reason: HandEndReason,
        final_stacks: Vec<(PlayerId, u32)>,
    },
}

impl TableEvent {
    /// Stable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TableEvent::HandStarted { .. } => "hand_started",
            TableEvent::HoleCardsDealt { .. } => "hole_cards_dealt",
            TableEvent::ActionTaken { .. } => "action_taken",
            TableEvent::AutoFolded { .. } => "auto_folded",
            TableEvent::ActionPrompt { .. } => "action_prompt",
            TableEvent::StreetClosed { .. } => "street_closed",
            TableEvent::StreetRevealed { .. } => "street_revealed",
            TableEvent::ShowdownSummary { .. } => "showdown_summary",
            TableEvent::PotAwarded { .. } => "pot_awarded",
            TableEvent::HandAborted { .. } => "hand_aborted",
            TableEvent::HandFinished { .. } => "hand_finished",
        }
    }
}
