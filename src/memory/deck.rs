use rand::Rng;
use rand::seq::SliceRandom;

/// Number of distinct faces; each appears twice in a deck
pub const PAIR_COUNT: usize = 8;

/// Identity of a card's picture, `0..PAIR_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardFace(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    FaceUp,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub face: CardFace,
    pub state: CardState,
}

impl Card {
    pub fn hidden(face: CardFace) -> Self {
        Self {
            face,
            state: CardState::Hidden,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.state == CardState::Hidden
    }
}

/// A face-down deck with every face twice, shuffled
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards: Vec<Card> = (0..PAIR_COUNT as u8)
        .flat_map(|face| [Card::hidden(CardFace(face)), Card::hidden(CardFace(face))])
        .collect();
    cards.shuffle(rng);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn test_every_face_appears_twice() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let deck = shuffled_deck(&mut rng);
            assert_eq!(deck.len(), PAIR_COUNT * 2);

            let mut counts: HashMap<CardFace, usize> = HashMap::new();
            for card in &deck {
                assert!(card.is_hidden());
                *counts.entry(card.face).or_default() += 1;
            }
            assert_eq!(counts.len(), PAIR_COUNT);
            assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn test_shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = shuffled_deck(&mut rng);
        let differs = (0..10).any(|_| shuffled_deck(&mut rng) != first);
        assert!(differs);
    }
}
