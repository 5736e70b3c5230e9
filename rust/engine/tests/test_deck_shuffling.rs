use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use riverboat_engine::cards::{Card, Rank, Suit};
use riverboat_engine::deck::Deck;
use riverboat_engine::errors::GameError;

#[test]
fn fresh_deck_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.draw().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    let a: Vec<Card> = d1.draw_n(10).unwrap();
    let b: Vec<Card> = d2.draw_n(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let a = Deck::new_with_seed(1).draw_n(10).unwrap();
    let b = Deck::new_with_seed(2).draw_n(10).unwrap();
    assert_ne!(
        a, b,
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn caller_rng_drives_the_shuffle() {
    let mut r1 = ChaCha20Rng::seed_from_u64(9);
    let mut r2 = ChaCha20Rng::seed_from_u64(9);
    let a = Deck::shuffled(&mut r1).draw_n(52).unwrap();
    let b = Deck::shuffled(&mut r2).draw_n(52).unwrap();
    assert_eq!(a, b);
}

#[test]
fn draw_n_takes_nothing_when_short() {
    let mut deck = Deck::new_with_seed(3);
    deck.draw_n(50).unwrap();
    assert_eq!(deck.draw_n(3), Err(GameError::DeckExhausted));
    assert_eq!(deck.remaining(), 2);
}

#[test]
fn stacked_deck_deals_from_the_end() {
    let ace = Card::new(Rank::Ace, Suit::Spades);
    let two = Card::new(Rank::Two, Suit::Clubs);
    let mut deck = Deck::stacked(vec![two, ace]);
    assert_eq!(deck.draw().unwrap(), ace);
    assert_eq!(deck.draw().unwrap(), two);
}
