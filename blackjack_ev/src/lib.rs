pub mod calculation;
mod cards;
mod error;
pub mod simulation;
mod statearray;
pub mod strategy;

use serde::Serialize;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use cards::{
    deck::Deck,
    hand::{Hand, HandTotal},
    Card, CardParseError, Rank, RankParseError, Suit, SuitParseError,
};
pub use error::BlackjackError;
pub use statearray::TotalArray;

/// Dealer up card values, where 11 stands for Ace.
pub const UP_CARDS: [u8; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Table rules. The dealer always stands on soft 17 and never peeks for a natural.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub number_of_decks: u8, // Only used by Monte Carlo simulation.
    pub double_policy: DoublePolicy,
    pub allow_decisions_after_split_aces: bool,

    pub payout_blackjack: f64,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 8,
            double_policy: DoublePolicy::AnyTwo,
            allow_decisions_after_split_aces: false,
            payout_blackjack: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DoublePolicy {
    AnyTwo,
    NineTenElevenOnly,
    TenElevenOnly,
}

impl DoublePolicy {
    /// Whether a two-card hand with the given total may double down.
    pub fn allows(&self, total: u8, is_soft: bool) -> bool {
        match self {
            DoublePolicy::AnyTwo => true,
            DoublePolicy::NineTenElevenOnly => !is_soft && (9..=11).contains(&total),
            DoublePolicy::TenElevenOnly => !is_soft && (10..=11).contains(&total),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}

/// Returns the up card if it is a valid dealer up card value.
pub fn check_up_card(up_card: u8) -> Result<u8, BlackjackError> {
    if UP_CARDS.contains(&up_card) {
        Ok(up_card)
    } else {
        Err(BlackjackError::InvalidUpCard(up_card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_policy_filters_totals() {
        assert!(DoublePolicy::AnyTwo.allows(18, true));
        assert!(DoublePolicy::NineTenElevenOnly.allows(9, false));
        assert!(!DoublePolicy::NineTenElevenOnly.allows(9, true));
        assert!(!DoublePolicy::TenElevenOnly.allows(9, false));
        assert!(DoublePolicy::TenElevenOnly.allows(11, false));
    }

    #[test]
    fn double_policy_parses_from_str() {
        let policy: DoublePolicy = "TenElevenOnly".parse().unwrap();
        assert_eq!(policy, DoublePolicy::TenElevenOnly);
        assert!("Sometimes".parse::<DoublePolicy>().is_err());
    }

    #[test]
    fn up_card_range() {
        assert_eq!(check_up_card(11), Ok(11));
        assert_eq!(check_up_card(1), Err(BlackjackError::InvalidUpCard(1)));
        assert_eq!(check_up_card(12), Err(BlackjackError::InvalidUpCard(12)));
    }
}
