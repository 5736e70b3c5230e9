//! Plain-text rendering of cards, boards and hand strengths.
//!
//! ```rust
//! use riverboat_engine::cards::parse_cards;
//! use riverboat_cli::formatters::format_board;
//!
//! let flop = parse_cards("As Kh Qd").unwrap();
//! assert_eq!(format_board(&flop), "[As Kh Qd]");
//! ```

use riverboat_engine::cards::{Card, Rank};
use riverboat_engine::hand::{Category, HandRank};

/// Cards separated by single spaces.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Board in bracket notation, `[]` before the flop.
pub fn format_board(cards: &[Card]) -> String {
    format!("[{}]", format_cards(cards))
}

fn label(value: u8) -> &'static str {
    Rank::from_value(value).map_or("?", Rank::label)
}

/// Category plus the ranks that decide it, e.g. `Full House (K over 7)`.
pub fn format_hand_rank(rank: &HandRank) -> String {
    let name = rank.category.name();
    match rank.category {
        Category::StraightFlush | Category::Straight => {
            format!("{} ({} high)", name, label(rank.primary))
        }
        Category::FourOfAKind | Category::ThreeOfAKind | Category::OnePair => {
            format!("{} ({})", name, label(rank.primary))
        }
        Category::FullHouse | Category::TwoPair => format!(
            "{} ({} over {})",
            name,
            label(rank.primary),
            label(rank.secondary)
        ),
        Category::Flush | Category::HighCard => format!("{} ({} high)", name, label(rank.kickers[0])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_engine::cards::parse_cards;
    use riverboat_engine::hand::best_hand;

    fn rank_of(cards: &str) -> HandRank {
        best_hand(&parse_cards(cards).unwrap()).unwrap()
    }

    #[test]
    fn empty_board() {
        assert_eq!(format_board(&[]), "[]");
    }

    #[test]
    fn hand_descriptions() {
        assert_eq!(
            format_hand_rank(&rank_of("Ah 2c 3d 4s 5h")),
            "Straight (5 high)"
        );
        assert_eq!(
            format_hand_rank(&rank_of("Kh Kc Kd 7s 7h")),
            "Full House (K over 7)"
        );
        assert_eq!(
            format_hand_rank(&rank_of("2h 9h Jh 4h 6h")),
            "Flush (J high)"
        );
        assert_eq!(format_hand_rank(&rank_of("Qh Qc 3d 8s 9h")), "One Pair (Q)");
    }
}
