use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{card_probability, WinLoseCasesOdds, CARD_VALUES};
use crate::{check_up_card, BlackjackError, HandTotal};

const DEALER_STAND_TOTAL: u8 = 17;

/// Probabilities of the dealer's final hand: a total from 17 to 21, bust, or a natural.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeDistribution {
    p_total: [f64; 5],
    pub p_bust: f64,
    pub p_blackjack: f64,
}

impl OutcomeDistribution {
    fn end_with_total(total: u8) -> Self {
        let mut odds = Self::default();
        odds.p_total[(total - DEALER_STAND_TOTAL) as usize] = 1.0;
        odds
    }

    fn end_with_bust() -> Self {
        Self {
            p_bust: 1.0,
            ..Default::default()
        }
    }

    fn end_with_natural() -> Self {
        Self {
            p_blackjack: 1.0,
            ..Default::default()
        }
    }

    /// Probability that the dealer ends with exactly `total` (without a natural).
    pub fn p_total(&self, total: u8) -> f64 {
        if (DEALER_STAND_TOTAL..=21).contains(&total) {
            self.p_total[(total - DEALER_STAND_TOTAL) as usize]
        } else {
            0.0
        }
    }

    pub fn sum(&self) -> f64 {
        self.p_total.iter().sum::<f64>() + self.p_bust + self.p_blackjack
    }

    pub fn add_assign_with_p(&mut self, rhs: &Self, p: f64) {
        for (lhs, rhs) in self.p_total.iter_mut().zip(rhs.p_total.iter()) {
            *lhs += rhs * p;
        }
        self.p_bust += rhs.p_bust * p;
        self.p_blackjack += rhs.p_blackjack * p;
    }

    /// Dealer busts or stands on a total below the player's.
    pub fn p_worse_than_player(&self, player_total: u8) -> f64 {
        self.p_bust
            + (DEALER_STAND_TOTAL..player_total.min(22))
                .map(|total| self.p_total(total))
                .sum::<f64>()
    }

    /// Dealer gets a natural or stands on a total above the player's.
    pub fn p_better_than_player(&self, player_total: u8) -> f64 {
        self.p_blackjack
            + (player_total.max(DEALER_STAND_TOTAL - 1) + 1..=21)
                .map(|total| self.p_total(total))
                .sum::<f64>()
    }

    /// Odds of a non-natural player hand that stands on `player_total`.
    pub fn stand_odds(&self, player_total: u8) -> WinLoseCasesOdds {
        if player_total > 21 {
            return WinLoseCasesOdds {
                lose: 1.0,
                ..Default::default()
            };
        }
        WinLoseCasesOdds {
            win: self.p_worse_than_player(player_total),
            push: self.p_total(player_total),
            lose: self.p_better_than_player(player_total),
        }
    }
}

impl Serialize for OutcomeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for total in DEALER_STAND_TOTAL..=21 {
            map.serialize_entry(&total.to_string(), &self.p_total(total))?;
        }
        map.serialize_entry("bust", &self.p_bust)?;
        map.serialize_entry("blackjack", &self.p_blackjack)?;
        map.end()
    }
}

/// Outcome distributions of every state in which the dealer still has to draw.
struct DealerDrawTable {
    hard: [OutcomeDistribution; DEALER_STAND_TOTAL as usize],
    soft: [OutcomeDistribution; DEALER_STAND_TOTAL as usize],
}

impl DealerDrawTable {
    fn build() -> Self {
        let mut table = DealerDrawTable {
            hard: [OutcomeDistribution::default(); DEALER_STAND_TOTAL as usize],
            soft: [OutcomeDistribution::default(); DEALER_STAND_TOTAL as usize],
        };

        // Hard totals from 11 only reach larger hard totals. Soft totals reach larger
        // soft totals or fall back to hard 12 to 16. Hard totals below 11 may reach any of them.
        let order = (11..DEALER_STAND_TOTAL)
            .rev()
            .map(|total| HandTotal::new(total, false))
            .chain((12..DEALER_STAND_TOTAL).rev().map(|total| HandTotal::new(total, true)))
            .chain((4..11).rev().map(|total| HandTotal::new(total, false)));
        for state in order {
            let mut odds = OutcomeDistribution::default();
            for value in CARD_VALUES {
                let next = table.resolve(state.add_card_value(value));
                odds.add_assign_with_p(&next, card_probability(value));
            }
            table.set(state, odds);
        }

        table
    }

    fn set(&mut self, state: HandTotal, odds: OutcomeDistribution) {
        if state.is_soft() {
            self.soft[state.total as usize] = odds;
        } else {
            self.hard[state.total as usize] = odds;
        }
    }

    fn resolve(&self, state: HandTotal) -> OutcomeDistribution {
        if state.is_bust() {
            OutcomeDistribution::end_with_bust()
        } else if state.total >= DEALER_STAND_TOTAL {
            OutcomeDistribution::end_with_total(state.total)
        } else if state.is_soft() {
            self.soft[state.total as usize]
        } else {
            self.hard[state.total as usize]
        }
    }

    /// The hole card is the only draw that can make a natural.
    fn after_up_card(&self, up_card: u8) -> OutcomeDistribution {
        let up = HandTotal::default().add_card_value(up_card);
        let mut odds = OutcomeDistribution::default();
        for hole_card in CARD_VALUES {
            let next = if up_card + hole_card == 21 {
                OutcomeDistribution::end_with_natural()
            } else {
                self.resolve(up.add_card_value(hole_card))
            };
            odds.add_assign_with_p(&next, card_probability(hole_card));
        }
        odds
    }
}

/// Distribution of the dealer's final hand given the up card, or over every up card
/// when `up_card` is `None`. The up card itself is not weighted by its probability.
pub fn dealer_outcome_distribution(
    up_card: Option<u8>,
) -> Result<OutcomeDistribution, BlackjackError> {
    let table = DealerDrawTable::build();
    match up_card {
        Some(up_card) => Ok(table.after_up_card(check_up_card(up_card)?)),
        None => {
            let mut odds = OutcomeDistribution::default();
            for up_card in CARD_VALUES {
                odds.add_assign_with_p(&table.after_up_card(up_card), card_probability(up_card));
            }
            Ok(odds)
        }
    }
}

/// Odds of taking exactly one more card and standing.
pub fn hit_once_odds(dealer_odds: &OutcomeDistribution, hand: HandTotal) -> WinLoseCasesOdds {
    let mut odds = WinLoseCasesOdds::default();
    for value in CARD_VALUES {
        let next = hand.add_card_value(value);
        odds += &(dealer_odds.stand_odds(next.total) * card_probability(value));
    }
    odds
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks every dealer draw sequence one card at a time.
    fn enumerate_paths(path: &mut Vec<u8>, p: f64, odds: &mut OutcomeDistribution) {
        let mut total: u8 = path.iter().sum();
        let mut soft_aces = path.iter().filter(|v| **v == 11).count();
        while total > 21 && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        if total >= 17 {
            let outcome = if path.len() == 2 && path.contains(&10) && path.contains(&11) {
                OutcomeDistribution::end_with_natural()
            } else if total > 21 {
                OutcomeDistribution::end_with_bust()
            } else {
                OutcomeDistribution::end_with_total(total)
            };
            odds.add_assign_with_p(&outcome, p);
            return;
        }
        for value in CARD_VALUES {
            path.push(value);
            enumerate_paths(path, p * card_probability(value), odds);
            path.pop();
        }
    }

    fn enumerated(up_card: Option<u8>) -> OutcomeDistribution {
        let mut odds = OutcomeDistribution::default();
        let mut path: Vec<u8> = up_card.into_iter().collect();
        enumerate_paths(&mut path, 1.0, &mut odds);
        odds
    }

    fn assert_close(lhs: &OutcomeDistribution, rhs: &OutcomeDistribution, tolerance: f64) {
        for total in 17..=21 {
            assert!((lhs.p_total(total) - rhs.p_total(total)).abs() < tolerance);
        }
        assert!((lhs.p_bust - rhs.p_bust).abs() < tolerance);
        assert!((lhs.p_blackjack - rhs.p_blackjack).abs() < tolerance);
    }

    #[test]
    fn distributions_sum_to_one() {
        for up_card in CARD_VALUES {
            let odds = dealer_outcome_distribution(Some(up_card)).unwrap();
            assert!((odds.sum() - 1.0).abs() < 1e-9);
        }
        let odds = dealer_outcome_distribution(None).unwrap();
        assert!((odds.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn table_matches_path_enumeration() {
        for up_card in CARD_VALUES {
            let odds = dealer_outcome_distribution(Some(up_card)).unwrap();
            assert_close(&odds, &enumerated(Some(up_card)), 1e-12);
        }
        let odds = dealer_outcome_distribution(None).unwrap();
        assert_close(&odds, &enumerated(None), 1e-12);
    }

    #[test]
    fn known_dealer_odds() {
        let odds = dealer_outcome_distribution(None).unwrap();
        assert!((odds.p_blackjack - 8.0 / 169.0).abs() < 1e-12);
        assert!((odds.p_bust - 0.28159285).abs() < 1e-7);

        let six = dealer_outcome_distribution(Some(6)).unwrap();
        assert_eq!(six.p_blackjack, 0.0);
        assert!((six.p_bust - 0.42315049).abs() < 1e-7);
        assert!((six.p_total(17) - 0.16543818).abs() < 1e-7);

        let ten = dealer_outcome_distribution(Some(10)).unwrap();
        assert!((ten.p_blackjack - 1.0 / 13.0).abs() < 1e-12);
        assert!((ten.p_total(20) - 0.34219357).abs() < 1e-7);

        let ace = dealer_outcome_distribution(Some(11)).unwrap();
        assert!((ace.p_blackjack - 4.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_up_card() {
        assert_eq!(
            dealer_outcome_distribution(Some(1)),
            Err(BlackjackError::InvalidUpCard(1))
        );
    }

    #[test]
    fn stand_odds_partition() {
        let odds = dealer_outcome_distribution(Some(9)).unwrap();
        for player_total in 4..=21 {
            let stand = odds.stand_odds(player_total);
            assert!((stand.win + stand.push + stand.lose - 1.0).abs() < 1e-9);
        }
        assert_eq!(odds.stand_odds(16).push, 0.0);
        assert_eq!(odds.stand_odds(22).lose, 1.0);
        assert!(odds.stand_odds(21).win > odds.stand_odds(17).win);
    }

    #[test]
    fn hit_once_on_hard_21_always_busts() {
        let odds = dealer_outcome_distribution(Some(7)).unwrap();
        let hit = hit_once_odds(&odds, HandTotal::new(21, false));
        assert!((hit.lose - 1.0).abs() < 1e-12);
        let soft = hit_once_odds(&odds, HandTotal::new(21, true));
        assert!(soft.lose < 1.0);
    }
}
