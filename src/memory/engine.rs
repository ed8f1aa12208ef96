use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;
use tracing::{debug, info};

use super::deck::{Card, CardState, PAIR_COUNT, shuffled_deck};

/// Points awarded per matched pair
pub const MATCH_REWARD: u32 = 10;

/// How long a mismatched pair stays visible before the driver hides it
pub const MISMATCH_DELAY: Duration = Duration::from_secs(2);

/// Delay before the win notice appears
pub const WIN_NOTICE_DELAY: Duration = Duration::from_millis(500);

/// Result of trying to turn a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The flip was not allowed and nothing changed
    Rejected,
    /// First card of a pair is now face-up
    FirstCard,
    /// Second card matched the first
    Match { won: bool },
    /// Second card differs; both stay up until resolved
    Mismatch,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySnapshot<'a> {
    pub cards: &'a [Card],
    pub score: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub mismatch_pending: bool,
    pub won: bool,
}

pub struct MemoryEngine {
    cards: Vec<Card>,
    selection: Vec<usize>,
    matched_pairs: usize,
    score: u32,
    rng: StdRng,
}

impl MemoryEngine {
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cards = shuffled_deck(&mut rng);

        Self {
            cards,
            selection: Vec::with_capacity(2),
            matched_pairs: 0,
            score: 0,
            rng,
        }
    }

    /// Reshuffle and clear progress
    pub fn reset(&mut self) {
        self.cards = shuffled_deck(&mut self.rng);
        self.selection.clear();
        self.matched_pairs = 0;
        self.score = 0;
        info!("memory game reset");
    }

    /// Turn the card at `index` face-up
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.is_won() || self.selection.len() >= 2 {
            return FlipOutcome::Rejected;
        }
        match self.cards.get(index) {
            Some(card) if card.is_hidden() => {}
            _ => return FlipOutcome::Rejected,
        }

        self.cards[index].state = CardState::FaceUp;
        self.selection.push(index);

        let [first, second] = match self.selection[..] {
            [a, b] => [a, b],
            _ => return FlipOutcome::FirstCard,
        };

        if self.cards[first].face == self.cards[second].face {
            self.cards[first].state = CardState::Matched;
            self.cards[second].state = CardState::Matched;
            self.selection.clear();
            self.matched_pairs += 1;
            self.score += MATCH_REWARD;

            let won = self.is_won();
            debug!(pairs = self.matched_pairs, score = self.score, "pair matched");
            if won {
                info!(score = self.score, "memory game won");
            }
            FlipOutcome::Match { won }
        } else {
            FlipOutcome::Mismatch
        }
    }

    /// Turn a pending mismatched pair back down. Returns false if there was none.
    pub fn resolve_mismatch(&mut self) -> bool {
        if !self.mismatch_pending() {
            return false;
        }
        for index in self.selection.drain(..) {
            self.cards[index].state = CardState::Hidden;
        }
        true
    }

    pub fn mismatch_pending(&self) -> bool {
        self.selection.len() == 2
    }

    pub fn is_won(&self) -> bool {
        self.matched_pairs == PAIR_COUNT
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn snapshot(&self) -> MemorySnapshot<'_> {
        MemorySnapshot {
            cards: &self.cards,
            score: self.score,
            matched_pairs: self.matched_pairs,
            total_pairs: PAIR_COUNT,
            mismatch_pending: self.mismatch_pending(),
            won: self.is_won(),
        }
    }
}
