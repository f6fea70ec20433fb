use super::Card;

/// A hand total together with the number of aces still counted as 11.
///
/// After every `add_card_value`, `total` is at most 21 unless no soft ace is
/// left to reduce, so there is never more than one soft ace in a valid total.
/// A busted total saturates at `u8::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandTotal {
    pub total: u8,
    pub soft_aces: u8,
}

impl HandTotal {
    pub fn new(total: u8, is_soft: bool) -> HandTotal {
        HandTotal {
            total,
            soft_aces: is_soft as u8,
        }
    }

    /// Adds a card value (11 for an Ace) and reduces soft aces while the total exceeds 21.
    pub fn add_card_value(self, value: u8) -> HandTotal {
        let mut total = self.total.saturating_add(value);
        let mut soft_aces = self.soft_aces + (value == 11) as u8;
        while total > 21 && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        HandTotal { total, soft_aces }
    }

    pub fn is_soft(&self) -> bool {
        self.soft_aces > 0
    }

    pub fn is_bust(&self) -> bool {
        self.total > 21
    }
}

/// An ordered group of cards. The order only matters for detecting a natural.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand { cards: Vec::new() }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn hand_total(&self) -> HandTotal {
        self.cards
            .iter()
            .fold(HandTotal::default(), |acc, card| acc.add_card_value(card.value()))
    }

    pub fn value(&self) -> u8 {
        self.hand_total().total
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    pub fn is_soft(&self) -> bool {
        self.hand_total().is_soft()
    }

    /// Ace and a ten-valued card as the only two cards.
    pub fn is_natural(&self) -> bool {
        if self.cards.len() != 2 {
            return false;
        }
        let (a, b) = (self.cards[0].value(), self.cards[1].value());
        (a, b) == (11, 10) || (a, b) == (10, 11)
    }

    /// Removes and returns every card after the first `keep` cards.
    pub fn take_cards_after(&mut self, keep: usize) -> Vec<Card> {
        if keep >= self.cards.len() {
            return Vec::new();
        }
        self.cards.split_off(keep)
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(text: &str) -> Hand {
        text.split_whitespace().map(|c| c.parse::<Card>().unwrap()).collect()
    }

    #[test]
    fn soft_aces_are_reduced() {
        assert_eq!(hand("A A").value(), 12);
        assert_eq!(hand("A 9").value(), 20);
        assert_eq!(hand("A 5 8").value(), 14);
        assert_eq!(hand("A A A A").value(), 14);
        assert_eq!(hand("A A T").value(), 12);
        assert!(hand("A 6").is_soft());
        assert!(!hand("A 6 T").is_soft());
    }

    #[test]
    fn face_cards_do_not_bust() {
        let h = hand("K Q");
        assert_eq!(h.value(), 20);
        assert!(!h.is_bust());
        assert!(hand("K Q 2").is_bust());
        assert_eq!(hand("K Q 5").value(), 25);
    }

    #[test]
    fn natural_is_two_cards_only() {
        assert!(hand("A K").is_natural());
        assert!(hand("TS AH").is_natural());
        assert!(!hand("A 5 5").is_natural());
        assert_eq!(hand("A 5 5").value(), 21);
        assert!(!hand("A A").is_natural());
    }

    #[test]
    fn hand_total_tracks_soft_aces() {
        let total = HandTotal::new(16, true).add_card_value(10);
        assert_eq!(total, HandTotal::new(16, false));
        let total = HandTotal::new(12, true).add_card_value(11);
        assert_eq!(total, HandTotal::new(13, true));
        let total = HandTotal::new(20, false).add_card_value(5);
        assert!(total.is_bust());
    }

    #[test]
    fn long_busted_hand_stays_busted() {
        let kings: Hand = std::iter::repeat(Card::new(crate::Rank::King, None))
            .take(26)
            .collect();
        assert_eq!(kings.value(), 255);
        assert!(kings.is_bust());
        assert!(HandTotal::new(250, false).add_card_value(11).is_bust());
    }

    #[test]
    fn take_cards_after_keeps_prefix() {
        let mut h = hand("7 2 3 9");
        let taken = h.take_cards_after(1);
        assert_eq!(h.len(), 1);
        assert_eq!(taken.len(), 3);
        assert_eq!(taken[0].value(), 2);
        assert!(h.take_cards_after(5).is_empty());
    }
}
