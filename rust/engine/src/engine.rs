use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::betting::{BettingRound, HandEndReason};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::logger::{ActionRecord, PotAward, ShownHand, Street};
use crate::player::PlayerId;

/// Identifies one armed turn deadline. A new token is minted every time the
/// action moves, so a timeout carrying an old token is recognisably stale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeadlineToken(pub u64);

impl fmt::Display for DeadlineToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hand-scoped state. Created by [`crate::game::Table::start_hand`] and
/// dropped by [`crate::game::Table::end_hand`]; nothing here survives a hand.
#[derive(Debug, Clone)]
pub(crate) struct Hand {
    pub(crate) id: String,
    pub(crate) seed: Option<u64>,
    deck: Deck,
    pub(crate) board: Vec<Card>,
    pub(crate) street: Street,
    /// Chips already flushed off the street.
    pub(crate) pot: u32,
    pub(crate) round: BettingRound,
    pub(crate) token: Option<DeadlineToken>,
    pub(crate) dealer: PlayerId,
    pub(crate) posted: Vec<(PlayerId, u32)>,
    pub(crate) actions: Vec<ActionRecord>,
    pub(crate) awards: Vec<PotAward>,
    pub(crate) shown: Vec<ShownHand>,
    pub(crate) won: BTreeMap<PlayerId, u32>,
    pub(crate) outcome: Option<HandEndReason>,
}

impl Hand {
    pub(crate) fn new(
        id: String,
        seed: Option<u64>,
        deck: Deck,
        dealer: PlayerId,
        big_blind: u32,
    ) -> Self {
        Self {
            id,
            seed,
            deck,
            board: Vec::with_capacity(5),
            street: Street::Preflop,
            pot: 0,
            round: BettingRound::new(big_blind),
            token: None,
            dealer,
            posted: Vec::with_capacity(2),
            actions: Vec::new(),
            awards: Vec::new(),
            shown: Vec::new(),
            won: BTreeMap::new(),
            outcome: None,
        }
    }

    pub(crate) fn deal_hole(&mut self) -> Result<[Card; 2], GameError> {
        let first = self.deck.draw()?;
        let second = self.deck.draw()?;
        Ok([first, second])
    }

    /// Moves to `street` and appends its community cards to the board.
    /// On failure the board is left as it was.
    pub(crate) fn reveal(&mut self, street: Street) -> Result<Vec<Card>, GameError> {
        let cards = self.deck.draw_n(street.cards_revealed())?;
        self.board.extend_from_slice(&cards);
        self.street = street;
        Ok(cards)
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub(crate) fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
}
