pub mod deck;
pub mod hand;

use std::fmt;
use std::str::FromStr;

use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Blackjack value of the rank. An Ace counts as 11 here and is reduced by the hand.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    /// Some rank with the given blackjack value. Ten-valued cards map to `Ten`.
    pub fn from_value(value: u8) -> Option<Rank> {
        let rank = match value {
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            1 | 11 => Rank::Ace,
            _ => return None,
        };
        Some(rank)
    }

    pub fn to_char(&self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::try_from(c).map_err(|_| RankParseError::Invalid(s.to_string())),
            _ => Err(RankParseError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Rank::Ace),
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            _ => Err(RankParseError::Invalid(c.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Suit {
    Diamond,
    Club,
    Heart,
    Spade,
}

impl Suit {
    pub fn to_char(&self) -> char {
        match self {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'D' => Ok(Suit::Diamond),
            'C' => Ok(Suit::Club),
            'H' => Ok(Suit::Heart),
            'S' => Ok(Suit::Spade),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// Represents a card in the real world. The suit only matters for bookkeeping in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Option<Suit>,
}

impl Card {
    pub fn new(rank: Rank, suit: Option<Suit>) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Equality by rank, and by suit only when both cards track one.
    /// `==` compares the suit field exactly.
    pub fn matches(&self, other: &Card) -> bool {
        self.rank == other.rank
            && match (self.suit, other.suit) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{}{}", self.rank.to_char(), suit.to_char()),
            None => write!(f, "{}", self.rank.to_char()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("empty card")]
    Empty,
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses `"AS"`, `"10h"` or a bare rank such as `"K"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let last = t.chars().next_back().ok_or(CardParseError::Empty)?;
        if t.len() > 1 {
            if let Ok(suit) = Suit::try_from(last) {
                let rank = t[..t.len() - last.len_utf8()].parse()?;
                return Ok(Card::new(rank, Some(suit)));
            }
        }
        Ok(Card::new(t.parse()?, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn rank_values() {
        let values: Vec<u8> = Rank::iter().map(|rank| rank.value()).collect();
        assert_eq!(values, vec![11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10]);
        for value in 2..=11 {
            assert_eq!(Rank::from_value(value).unwrap().value(), value);
        }
        assert_eq!(Rank::from_value(12), None);
    }

    #[test]
    fn parse_cards() {
        assert_eq!(
            "AS".parse::<Card>().unwrap(),
            Card::new(Rank::Ace, Some(Suit::Spade))
        );
        assert_eq!(
            "10h".parse::<Card>().unwrap(),
            Card::new(Rank::Ten, Some(Suit::Heart))
        );
        assert_eq!("k".parse::<Card>().unwrap(), Card::new(Rank::King, None));
        assert_eq!("10".parse::<Card>().unwrap(), Card::new(Rank::Ten, None));
        assert!(matches!("".parse::<Card>(), Err(CardParseError::Empty)));
        assert!(matches!("1S".parse::<Card>(), Err(CardParseError::Rank(_))));
        assert!(matches!("X".parse::<Card>(), Err(CardParseError::Rank(_))));
    }

    #[test]
    fn display_cards() {
        assert_eq!(Card::new(Rank::Ten, Some(Suit::Club)).to_string(), "TC");
        assert_eq!(Card::new(Rank::Ace, None).to_string(), "A");
    }

    #[test]
    fn suitless_card_matches_any_suit() {
        let ace = Card::new(Rank::Ace, None);
        let ace_of_spades = Card::new(Rank::Ace, Some(Suit::Spade));
        assert!(ace.matches(&ace_of_spades));
        assert!(ace_of_spades.matches(&ace));
        assert_ne!(ace, ace_of_spades);
        assert!(!ace_of_spades.matches(&Card::new(Rank::Ace, Some(Suit::Heart))));
        assert!(!ace.matches(&Card::new(Rank::King, Some(Suit::Spade))));
    }
}
