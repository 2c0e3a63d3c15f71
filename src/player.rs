//! Players, hands and decks.
//!
//! Dealing and discarding belong to the surrounding game loop; the engine
//! only reads `color`, `hand` and `profile`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Card, Color, COPIES_PER_VALUE, DECK_SIZE, MAX_CARD_VALUE, MIN_CARD_VALUE};
use crate::config::AiProfile;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    /// Cards available this turn, in dealing order
    pub hand: Vec<Card>,
    /// Remaining cards, dealt from the back
    pub deck: Vec<Card>,
    /// `None` for a human seat
    pub profile: Option<AiProfile>,
}

impl Player {
    /// Human seat with an empty hand and deck
    pub fn human(color: Color) -> Self {
        Self {
            color,
            hand: Vec::new(),
            deck: Vec::new(),
            profile: None,
        }
    }

    /// AI seat with an empty hand and deck
    pub fn ai(color: Color, profile: AiProfile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::human(color)
        }
    }

    pub fn with_hand(mut self, hand: Vec<Card>) -> Self {
        self.hand = hand;
        self
    }

    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = deck;
        self
    }

    #[inline]
    pub fn is_ai(&self) -> bool {
        self.profile.is_some()
    }

    /// Profile the engine plays with; human seats fall back to the default
    #[inline]
    pub fn effective_profile(&self) -> AiProfile {
        self.profile.unwrap_or_default()
    }

    /// Move up to `n` cards from the deck into the hand. Returns how many moved.
    pub fn deal(&mut self, n: usize) -> usize {
        let mut dealt = 0;
        while dealt < n {
            match self.deck.pop() {
                Some(card) => {
                    self.hand.push(card);
                    dealt += 1;
                }
                None => break,
            }
        }
        dealt
    }

    /// Remove one copy of `card` from the hand after it was played
    pub fn discard(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|&c| c == card) {
            Some(idx) => {
                self.hand.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// The 18 cards of one color: two of every value, ascending
pub fn full_deck(color: Color) -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for value in MIN_CARD_VALUE..=MAX_CARD_VALUE {
        for _ in 0..COPIES_PER_VALUE {
            deck.push(Card::new(value, color));
        }
    }
    deck
}

/// A full deck in random order
pub fn shuffled_deck<R: Rng + ?Sized>(color: Color, rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck(color);
    deck.shuffle(rng);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiLevel, AiType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_full_deck_composition() {
        let deck = full_deck(Color::Yellow);
        assert_eq!(deck.len(), 18);
        for value in 1..=9 {
            assert_eq!(deck.iter().filter(|c| c.value == value).count(), 2);
        }
        assert!(deck.iter().all(|c| c.color == Color::Yellow));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = shuffled_deck(Color::Red, &mut ChaCha8Rng::seed_from_u64(7));
        let b = shuffled_deck(Color::Red, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_by_key(|c| c.value);
        assert_eq!(sorted, full_deck(Color::Red));
    }

    #[test]
    fn test_deal_and_discard() {
        let mut player = Player::ai(Color::Blue, AiProfile::paranoid(AiLevel::Hard))
            .with_deck(full_deck(Color::Blue));
        assert_eq!(player.deal(3), 3);
        assert_eq!(player.hand.len(), 3);
        assert_eq!(player.deck.len(), 15);

        let card = player.hand[1];
        assert!(player.discard(card));
        assert_eq!(player.hand.len(), 2);
        assert!(!player.discard(Card::new(1, Color::Red)));
    }

    #[test]
    fn test_deal_stops_when_deck_runs_out() {
        let mut player = Player::human(Color::Green).with_deck(vec![Card::new(4, Color::Green)]);
        assert_eq!(player.deal(3), 1);
        assert!(player.deck.is_empty());
    }

    #[test]
    fn test_human_plays_with_default_profile() {
        let player = Player::human(Color::Red);
        assert!(!player.is_ai());
        let profile = player.effective_profile();
        assert_eq!(profile.kind, AiType::Smart);
        assert_eq!(profile.level, AiLevel::Medium);
    }
}
