//! # riverboat-engine: Texas Hold'em Rules Engine
//!
//! A pure, synchronous rules engine for a multiplayer hold'em table. It owns
//! no timers and does no I/O beyond the optional [`logger::HandLogger`];
//! callers feed it actions (and timer expiries) and get back new state plus
//! structured events. The wall clock is read only to date hand ids.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text parsing
//! - [`deck`] - Per-hand draw pile, shuffled with any `rand::Rng` or a ChaCha20 seed
//! - [`hand`] - Seven-card evaluation into a fixed-shape [`hand::HandRank`]
//! - [`pot`] - Side-pot layering and integer-exact pot splitting
//! - [`player`] - Seats, stacks and the actions a player can ask for
//! - [`rules`] - Action validation and degradation (call to check, raise to all-in)
//! - [`betting`] - Per-street betting state machine
//! - [`engine`] - Hand-scoped state and deadline tokens
//! - [`game`] - The [`game::Table`] lifecycle: blinds, streets, showdown, teardown
//! - [`events`] - Events emitted for presentation layers
//! - [`logger`] - Streets, hand records and JSONL hand history
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use riverboat_engine::cards::parse_cards;
//! use riverboat_engine::hand::{evaluate, Category};
//!
//! let v = parse_cards("Ah Kh Qh Jh 10h 2c 3d").unwrap();
//! let cards = [v[0], v[1], v[2], v[3], v[4], v[5], v[6]];
//! assert_eq!(evaluate(&cards).category, Category::StraightFlush);
//! ```
//!
//! ## Driving a hand
//!
//! ```rust
//! use riverboat_engine::betting::RoundStatus;
//! use riverboat_engine::game::{Table, TableConfig};
//! use riverboat_engine::player::{PlayerAction, PlayerId};
//!
//! let mut table = Table::new(TableConfig::default()).unwrap();
//! for id in 1..=3 {
//!     table.sit(PlayerId(id), &format!("p{id}"), 1000).unwrap();
//! }
//! let mut status = table.start_hand_seeded(42).unwrap().status;
//! loop {
//!     status = match status {
//!         RoundStatus::AwaitingAction(seat) => {
//!             table.apply_action(seat, PlayerAction::Call).unwrap().status
//!         }
//!         RoundStatus::StreetComplete => table.advance_street().unwrap().status,
//!         RoundStatus::HandComplete(_) => break,
//!     };
//! }
//! let end = table.end_hand().unwrap();
//! let total: u32 = end.final_stacks.iter().map(|(_, s)| s).sum();
//! assert_eq!(total, 3000);
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
