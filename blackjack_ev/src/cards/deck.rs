use rand::seq::SliceRandom;
use rand::Rng;
use strum::IntoEnumIterator;

use super::{hand::Hand, Card, Rank, Suit};
use crate::BlackjackError;

/// Represents one or more standard 52-card decks shuffled together.
#[derive(Debug, Clone)]
pub struct Deck {
    number_of_decks: u8,
    cards: Vec<Card>,
}

impl Deck {
    /// Creates a deck with ordered cards.
    pub fn new(number_of_decks: u8) -> Result<Deck, BlackjackError> {
        if number_of_decks == 0 {
            return Err(BlackjackError::ZeroDecks);
        }
        Ok(Deck {
            number_of_decks,
            cards: ordered_cards(number_of_decks),
        })
    }

    /// Removes and returns the last card.
    pub fn deal(&mut self) -> Result<Card, BlackjackError> {
        self.cards.pop().ok_or(BlackjackError::DeckUnderflow)
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the first card matching `card` (by rank, and by suit if `card` has one)
    /// and returns the actual card removed.
    pub fn remove_card(&mut self, card: &Card) -> Result<Card, BlackjackError> {
        let position = self
            .cards
            .iter()
            .position(|c| card.matches(c))
            .ok_or(BlackjackError::CardNotInDeck(*card))?;
        Ok(self.cards.remove(position))
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| card.matches(c))
    }

    /// Puts every card back in the original order.
    pub fn reset(&mut self) {
        self.cards = ordered_cards(self.number_of_decks);
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Fraction of the remaining cards that would bust `hand` if drawn next.
    pub fn bust_chance(&self, hand: &Hand) -> Result<f64, BlackjackError> {
        if self.cards.is_empty() {
            return Err(BlackjackError::EmptyDeck);
        }
        let current = hand.hand_total();
        let busting = self
            .cards
            .iter()
            .filter(|card| current.add_card_value(card.value()).is_bust())
            .count();
        Ok(busting as f64 / self.cards.len() as f64)
    }
}

fn ordered_cards(number_of_decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(number_of_decks as usize * 52);
    for _ in 0..number_of_decks {
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card::new(rank, Some(suit)));
            }
        }
    }
    cards
}
