//! Evaluate command: best five-card hand out of five to seven cards.

use crate::error::CliError;
use crate::formatters::{format_cards, format_hand_rank};
use crate::ui;
use riverboat_engine::cards::{Card, parse_cards};
use riverboat_engine::hand::best_hand;
use std::collections::HashSet;
use std::io::Write;

/// Prints the cards, the category and the full rank of the best hand.
///
/// Cards may be given as separate arguments or in one quoted string
/// (`"As Kd Qh Jc Th"`).
pub fn handle_eval_command(
    cards: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let parsed = match parse_cards(&cards.join(" ")) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(CliError::InvalidInput(e.to_string()));
        }
    };
    if let Some(dup) = first_duplicate(&parsed) {
        let msg = format!("card {} appears twice", dup);
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    let Some(rank) = best_hand(&parsed) else {
        let msg = format!("need 5 to 7 cards, got {}", parsed.len());
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    };

    writeln!(out, "Cards: {}", format_cards(&parsed))?;
    writeln!(out, "Hand: {}", format_hand_rank(&rank))?;
    writeln!(
        out,
        "Rank: category={} primary={} secondary={} kickers={:?}",
        rank.category as u8, rank.primary, rank.secondary, rank.kickers
    )?;
    Ok(())
}

fn first_duplicate(cards: &[Card]) -> Option<Card> {
    let mut seen = HashSet::new();
    cards.iter().copied().find(|c| !seen.insert(*c))
}
