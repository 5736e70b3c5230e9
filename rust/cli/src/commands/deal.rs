//! Deal command: one checked-down hand, shown face up.
//!
//! Every seat calls or checks each street, so the output shows the hole
//! cards, the complete board, each seat's best hand and who takes the pot.

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_board, format_cards, format_hand_rank};
use riverboat_engine::betting::RoundStatus;
use riverboat_engine::game::Table;
use riverboat_engine::player::{PlayerAction, PlayerId};
use std::io::Write;

/// Handle the deal command.
///
/// `seed` falls back to the configured seed, then to a random one; the seed
/// used is always printed so the hand can be dealt again.
pub fn handle_deal_command(
    seed: Option<u64>,
    seats: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let settings = config::load()?;
    let seed = seed.or(settings.seed).unwrap_or_else(rand::random);

    let mut table = Table::new(settings.table_config())?;
    for i in 1..=seats {
        table.sit(PlayerId(i as u64), &format!("P{}", i), settings.starting_stack)?;
    }

    let mut status = table.start_hand_seeded(seed)?.status;
    let holes: Vec<(PlayerId, String)> = table
        .seats()
        .iter()
        .filter_map(|s| table.hole_cards(s.id()).map(|c| (s.id(), format_cards(&c))))
        .collect();
    loop {
        status = match status {
            RoundStatus::AwaitingAction(seat) => {
                table.apply_action(seat, PlayerAction::Call)?.status
            }
            RoundStatus::StreetComplete => table.advance_street()?.status,
            RoundStatus::HandComplete(_) => break,
        };
    }
    let end = table.end_hand()?;

    writeln!(out, "Seed: {}", seed)?;
    for (id, cards) in &holes {
        writeln!(out, "Hole P{}: {}", id, cards)?;
    }
    writeln!(out, "Board: {}", format_board(&end.record.board))?;
    for shown in &end.record.showdown {
        writeln!(out, "Best P{}: {}", shown.seat, format_hand_rank(&shown.rank))?;
    }
    for award in &end.record.awards {
        let winners: Vec<String> = award.winners.iter().map(|w| format!("P{}", w)).collect();
        writeln!(out, "Pot {}: {}", award.pot.amount, winners.join(", "))?;
    }
    Ok(())
}
