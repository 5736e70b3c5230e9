//! Simulation command: many hands played by a seeded random policy.
//!
//! Every hand is driven through the engine exactly as a live table would be,
//! including turn timeouts and the occasional abort. The chip total is checked
//! after each hand; seats that bust or time out too often are reseated with the
//! starting stack so the table never runs short of players.

use crate::config;
use crate::error::CliError;
use crate::ui;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use riverboat_engine::betting::{HandEndReason, RoundStatus};
use riverboat_engine::errors::GameError;
use riverboat_engine::game::{HandEnd, Table};
use riverboat_engine::logger::HandLogger;
use riverboat_engine::player::{PlayerAction, PlayerId};
use std::collections::BTreeMap;
use std::io::Write;

/// Per-mille chance that the actor times out instead of acting.
const TIMEOUT_PER_MILLE: u32 = 20;
/// Per-mille chance that a hand is aborted at a decision point.
const ABORT_PER_MILLE: u32 = 2;
/// Decisions after which a hand is aborted outright.
const MAX_STEPS: usize = 1000;

#[derive(Debug, Default)]
struct Summary {
    hands: u64,
    reasons: BTreeMap<&'static str, u64>,
    actions: u64,
    timeouts: u64,
    reseats: u64,
    biggest_pot: u32,
}

/// Handle the sim command.
///
/// Writes one JSONL hand record per hand to `output` when given and prints a
/// summary. Fails on the first hand that does not conserve chips.
pub fn handle_sim_command(
    hands: u64,
    seats: usize,
    seed: Option<u64>,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        ui::write_error(err, "hands must be >= 1")?;
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let settings = config::load()?;
    let seed = seed.or(settings.seed).unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut logger = match &output {
        Some(path) => Some(HandLogger::create(path)?),
        None => None,
    };

    let mut table = Table::new(settings.table_config())?;
    let ids: Vec<PlayerId> = (1..=seats as u64).map(PlayerId).collect();
    for id in &ids {
        table.sit(*id, &format!("P{}", id), settings.starting_stack)?;
    }

    let mut summary = Summary::default();
    for _ in 0..hands {
        for id in &ids {
            if table.seat(*id).is_none() {
                table.sit(*id, &format!("P{}", id), settings.starting_stack)?;
                summary.reseats += 1;
            }
        }

        let before = table.total_chips();
        let end = play_hand(&mut table, &mut rng, &mut summary)?;
        let after: u64 = end.final_stacks.iter().map(|&(_, s)| u64::from(s)).sum();
        if after != before {
            let e = CliError::Conservation {
                hand_id: end.hand_id.clone(),
                before,
                after,
            };
            ui::write_error(err, &e.to_string())?;
            return Err(e);
        }

        summary.hands += 1;
        *summary.reasons.entry(reason_key(end.reason)).or_default() += 1;
        let pot: u32 = end.record.awards.iter().map(|a| a.pot.amount).sum();
        summary.biggest_pot = summary.biggest_pot.max(pot);

        if let Some(l) = logger.as_mut() {
            l.write(&end.record)?;
        }
    }

    writeln!(out, "Simulated {} hands ({} seats, seed {})", summary.hands, seats, seed)?;
    for (reason, n) in &summary.reasons {
        writeln!(out, "  {}: {}", reason, n)?;
    }
    writeln!(out, "Actions: {}", summary.actions)?;
    writeln!(out, "Timeouts: {}", summary.timeouts)?;
    writeln!(out, "Reseated: {}", summary.reseats)?;
    writeln!(out, "Biggest pot: {}", summary.biggest_pot)?;
    writeln!(out, "Chips conserved: yes")?;
    if let Some(path) = &output {
        writeln!(out, "Hand records: {}", path)?;
    }
    Ok(())
}

fn reason_key(reason: HandEndReason) -> &'static str {
    match reason {
        HandEndReason::AllButOneFolded => "uncontested",
        HandEndReason::ShowdownReached => "showdown",
        HandEndReason::Aborted => "aborted",
    }
}

fn random_action<R: Rng>(rng: &mut R, big_blind: u32) -> PlayerAction {
    match rng.random_range(0..10) {
        0 => PlayerAction::Fold,
        1 | 2 => PlayerAction::Check,
        3..=6 => PlayerAction::Call,
        7 | 8 => PlayerAction::Raise(rng.random_range(big_blind..=big_blind.saturating_mul(5))),
        _ => PlayerAction::Raise(
            rng.random_range(big_blind.saturating_mul(5)..=big_blind.saturating_mul(100)),
        ),
    }
}

fn play_hand<R: Rng>(
    table: &mut Table,
    rng: &mut R,
    summary: &mut Summary,
) -> Result<HandEnd, CliError> {
    let big_blind = table.config().big_blind;
    let mut status = table.start_hand_seeded(rng.random())?.status;
    let mut steps = 0;
    loop {
        steps += 1;
        status = match status {
            RoundStatus::AwaitingAction(_) if steps > MAX_STEPS => table.abort_hand()?.status,
            RoundStatus::AwaitingAction(seat) => {
                let roll = rng.random_range(0..1000);
                if roll < ABORT_PER_MILLE {
                    table.abort_hand()?.status
                } else if roll < ABORT_PER_MILLE + TIMEOUT_PER_MILLE {
                    let token = table
                        .live_token()
                        .ok_or(GameError::NoActionPending)?;
                    match table.on_timeout(seat, token) {
                        Some(outcome) => {
                            summary.timeouts += 1;
                            outcome.status
                        }
                        None => table.apply_action(seat, PlayerAction::Call)?.status,
                    }
                } else {
                    summary.actions += 1;
                    // an illegal random choice falls back to calling
                    match table.apply_action(seat, random_action(rng, big_blind)) {
                        Ok(outcome) => outcome.status,
                        Err(_) => table.apply_action(seat, PlayerAction::Call)?.status,
                    }
                }
            }
            RoundStatus::StreetComplete => match table.advance_street() {
                Ok(outcome) => outcome.status,
                Err(GameError::DeckExhausted) => break,
                Err(e) => return Err(e.into()),
            },
            RoundStatus::HandComplete(_) => break,
        };
    }
    Ok(table.end_hand()?)
}
