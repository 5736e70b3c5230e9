use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandRank;
use crate::player::PlayerId;
use crate::pot::Pot;
use crate::rules::ValidatedAction;

/// A betting phase of a hold'em hand, in dealing order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// Hole cards dealt, blinds posted
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
    /// Cards are compared; no more betting
    Showdown,
}

impl Street {
    /// The street that follows this one; `None` after showdown.
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Community cards revealed when this street begins.
    pub fn cards_revealed(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

/// Records a single action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: PlayerId,
    pub street: Street,
    pub action: ValidatedAction,
    /// Chips the action moved from the stack.
    pub amount: u32,
    /// Issued by the turn timer rather than the player.
    #[serde(default)]
    pub auto: bool,
}

/// One seat's cards and rank as revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: PlayerId,
    pub cards: [Card; 2],
    pub rank: HandRank,
}

/// How one pot was settled.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotAward {
    pub pot: Pot,
    pub winners: Vec<PlayerId>,
    pub shares: Vec<(PlayerId, u32)>,
}

/// Net effect of a hand on one seat.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatResult {
    pub seat: PlayerId,
    pub committed: u32,
    pub won: u32,
    pub final_stack: u32,
}

/// Complete record of a hand, one JSON object per line in a hand log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Deck seed, when the hand was dealt from a seeded deck
    pub seed: Option<u64>,
    pub dealer: PlayerId,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Blinds as actually posted (capped at the poster's stack).
    pub posted: Vec<(PlayerId, u32)>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    #[serde(default)]
    pub awards: Vec<PotAward>,
    #[serde(default)]
    pub showdown: Vec<ShownHand>,
    pub results: Vec<SeatResult>,
    /// Why the hand ended
    pub result: Option<String>,
    /// RFC3339, filled in by the logger when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Hands out sequential hand ids and appends [`HandRecord`]s as JSONL.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Id generator that writes nothing.
    pub fn in_memory() -> Self {
        Self {
            writer: None,
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
