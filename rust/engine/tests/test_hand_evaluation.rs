use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use riverboat_engine::cards::{full_deck, parse_cards, Card};
use riverboat_engine::hand::{best_hand, compare_hands, evaluate, Category, HandRank};

fn seven(s: &str) -> [Card; 7] {
    let v = parse_cards(s).expect("valid cards");
    [v[0], v[1], v[2], v[3], v[4], v[5], v[6]]
}

fn rank(s: &str) -> HandRank {
    evaluate(&seven(s))
}

#[test]
fn detects_royal_flush() {
    let hs = rank("10h Jh Qh Kh Ah 2c 3d");
    assert_eq!(hs.category, Category::StraightFlush);
    assert_eq!(hs.primary, 14);
}

#[test]
fn every_category_is_detected() {
    let cases = [
        ("Ac Kd 9h 7s 5c 3d 2h", Category::HighCard),
        ("Ac Ad 9h 7s 5c 3d 2h", Category::OnePair),
        ("Ac Ad 9h 9s 5c 3d 2h", Category::TwoPair),
        ("Ac Ad Ah 9s 5c 3d 2h", Category::ThreeOfAKind),
        ("9c 8d 7h 6s 5c Kd 2h", Category::Straight),
        ("Ac 9c 7c 5c 2c Kd Qh", Category::Flush),
        ("Ac Ad Ah 9s 9c 3d 2h", Category::FullHouse),
        ("Ac Ad Ah As 9c 3d 2h", Category::FourOfAKind),
        ("9c 8c 7c 6c 5c Kd 2h", Category::StraightFlush),
    ];
    for (cards, cat) in cases {
        assert_eq!(rank(cards).category, cat, "{cards}");
    }
}

#[test]
fn categories_are_monotonic() {
    let ladder = [
        rank("Ac Kd 9h 7s 5c 3d 2h"),
        rank("2c 2d 9h 7s 5c 4d 3h"),
        rank("2c 2d 3h 3s 5c 7d 9h"),
        rank("2c 2d 2h 9s 5c 4d 7h"),
        rank("Ac 2d 3h 4s 5c 9d Jh"),
        rank("2c 4c 6c 8c 9c Kd Qh"),
        rank("2c 2d 2h 3s 3c 9d Jh"),
        rank("2c 2d 2h 2s 3c 9d Jh"),
        rank("Ac 2c 3c 4c 5c 9d Jh"),
    ];
    for w in ladder.windows(2) {
        assert!(w[0] < w[1], "{:?} should lose to {:?}", w[0], w[1]);
    }
}

#[test]
fn wheel_ranks_below_six_high_straight() {
    let wheel = rank("Ac 2d 3h 4s 5c 9d Jh");
    let six_high = rank("2c 3d 4h 5s 6c 9d Jh");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.primary, 5);
    assert_eq!(six_high.primary, 6);
    assert_eq!(compare_hands(&wheel, &six_high), Ordering::Less);
}

#[test]
fn two_trips_make_a_full_house() {
    let r = rank("Kc Kd Kh 7s 7c 7d 2h");
    assert_eq!(r.category, Category::FullHouse);
    assert_eq!((r.primary, r.secondary), (13, 7));
}

#[test]
fn kickers_break_pair_ties() {
    let a = rank("Ac Ad Kh 9s 5c 3d 2h");
    let b = rank("Ah As Qh 9d 5s 3c 2d");
    assert_eq!(compare_hands(&a, &b), Ordering::Greater);
}

#[test]
fn board_plays_for_both_is_an_exact_tie() {
    // broadway on the board; both holdings are irrelevant
    let a = rank("2c 3d Ah Ks Qc Jd 10h");
    let b = rank("4c 5d Ah Ks Qc Jd 10h");
    assert_eq!(a, b);
    assert_eq!(compare_hands(&a, &b), Ordering::Equal);
}

#[test]
fn only_five_cards_count() {
    // sixth and seventh cards never break a tie between equal fives
    let a = rank("Ac Ad Ah As Kc 2d 3h");
    let b = rank("Ac Ad Ah As Kd Qd Jh");
    assert_eq!(a, b);
}

#[test]
fn best_hand_agrees_with_evaluate_on_seven_cards() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut deck = full_deck();
    for _ in 0..200 {
        deck.shuffle(&mut rng);
        let cards = [deck[0], deck[1], deck[2], deck[3], deck[4], deck[5], deck[6]];
        assert_eq!(best_hand(&cards), Some(evaluate(&cards)));
    }
}

#[test]
fn category_names_are_readable() {
    assert_eq!(Category::FullHouse.name(), "Full House");
    assert_eq!(rank("Ac Kd 9h 7s 5c 3d 2h").category.name(), "High Card");
}
