use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// Strength of a five-card hand.
///
/// Fields are compared in declaration order, so any hand of a higher
/// [`Category`] beats any hand of a lower one and ties inside a category fall
/// through to `primary`, `secondary` and then `kickers`. Unused slots are 0.
///
/// | category | primary | secondary | kickers |
/// |---|---|---|---|
/// | straight flush / straight | straight high (wheel = 5) | - | - |
/// | four of a kind | quad rank | - | `[kicker]` |
/// | full house | trips rank | pair rank | - |
/// | flush / high card | - | - | all five, descending |
/// | three of a kind | trips rank | - | top two others |
/// | two pair | high pair | low pair | `[kicker]` |
/// | one pair | pair rank | - | top three others |
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandRank {
    pub category: Category,
    pub primary: u8,
    pub secondary: u8,
    pub kickers: [u8; 5],
}

impl HandRank {
    fn new(category: Category, primary: u8, secondary: u8, kickers: &[u8]) -> Self {
        let mut k = [0u8; 5];
        k[..kickers.len()].copy_from_slice(kickers);
        Self {
            category,
            primary,
            secondary,
            kickers: k,
        }
    }
}

/// Best five-card hand out of seven cards: all 21 subsets are scored and the
/// maximum wins.
pub fn evaluate(cards: &[Card; 7]) -> HandRank {
    let mut best = score5(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    // every 5-card subset leaves out exactly one pair (i, j)
    for i in 0..7 {
        for j in (i + 1)..7 {
            let mut five = [cards[0]; 5];
            let mut n = 0;
            for (k, &c) in cards.iter().enumerate() {
                if k != i && k != j {
                    five[n] = c;
                    n += 1;
                }
            }
            best = best.max(score5(&five));
        }
    }
    best
}

/// Like [`evaluate`] for any holding of five to seven cards; `None` otherwise.
pub fn best_hand(cards: &[Card]) -> Option<HandRank> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return None;
    }
    (0u32..(1 << n))
        .filter(|mask| mask.count_ones() == 5)
        .map(|mask| {
            let mut five = [cards[0]; 5];
            let mut idx = 0;
            for (k, &c) in cards.iter().enumerate() {
                if mask & (1 << k) != 0 {
                    five[idx] = c;
                    idx += 1;
                }
            }
            score5(&five)
        })
        .max()
}

pub fn compare_hands(a: &HandRank, b: &HandRank) -> Ordering {
    a.cmp(b)
}

/// Scores exactly five cards.
pub fn score5(cards: &[Card; 5]) -> HandRank {
    let mut vals = cards.map(|c| c.rank.value());
    vals.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_high(&vals);

    // (count, rank) groups, biggest group first, higher rank first within a size
    let mut counts = [0u8; 15];
    for &v in &vals {
        counts[v as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| counts[r as usize] > 0)
        .map(|r| (counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    // five distinct ranks are needed for either, so neither can hold a pair
    match (flush, straight) {
        (true, Some(high)) => return HandRank::new(Category::StraightFlush, high, 0, &[]),
        (true, None) => return HandRank::new(Category::Flush, 0, 0, &vals),
        (false, Some(high)) => return HandRank::new(Category::Straight, high, 0, &[]),
        (false, None) => {}
    }
    match (groups[0].0, groups.get(1).map(|g| g.0)) {
        (4, _) => HandRank::new(Category::FourOfAKind, groups[0].1, 0, &[groups[1].1]),
        (3, Some(2)) => HandRank::new(Category::FullHouse, groups[0].1, groups[1].1, &[]),
        (3, _) => HandRank::new(
            Category::ThreeOfAKind,
            groups[0].1,
            0,
            &[groups[1].1, groups[2].1],
        ),
        (2, Some(2)) => HandRank::new(Category::TwoPair, groups[0].1, groups[1].1, &[groups[2].1]),
        (2, _) => HandRank::new(
            Category::OnePair,
            groups[0].1,
            0,
            &[groups[1].1, groups[2].1, groups[3].1],
        ),
        _ => HandRank::new(Category::HighCard, 0, 0, &vals),
    }
}

/// `vals` must be sorted descending. The wheel (A-2-3-4-5) is a 5-high straight.
fn straight_high(vals: &[u8; 5]) -> Option<u8> {
    let distinct = vals.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if vals[0] - vals[4] == 4 {
        Some(vals[0])
    } else if *vals == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    }
}
