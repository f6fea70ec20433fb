mod dealer_odds;
mod expectation;

use std::ops;

use serde::Serialize;

pub use dealer_odds::{dealer_outcome_distribution, hit_once_odds, OutcomeDistribution};
pub use expectation::{
    hit_ev, soft_hit_ev, split_ev, stand_ev, total_hit_ev, ExpectationTables,
};

/// Every card value that can be drawn. 11 stands for an Ace.
pub const CARD_VALUES: [u8; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Probability of drawing a card value from an infinite deck.
/// Ten, Jack, Queen and King all count as 10.
pub fn card_probability(value: u8) -> f64 {
    if value == 10 {
        4.0 / 13.0
    } else {
        1.0 / 13.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WinLoseCasesOdds {
    pub win: f64,
    pub push: f64,
    pub lose: f64,
}

impl WinLoseCasesOdds {
    /// Expected profit of a unit bet paid even money.
    pub fn expectation(&self) -> f64 {
        self.win - self.lose
    }
}

impl ops::AddAssign<&WinLoseCasesOdds> for WinLoseCasesOdds {
    fn add_assign(&mut self, rhs: &WinLoseCasesOdds) {
        self.win += rhs.win;
        self.push += rhs.push;
        self.lose += rhs.lose;
    }
}

impl ops::Mul<f64> for WinLoseCasesOdds {
    type Output = WinLoseCasesOdds;
    fn mul(self, rhs: f64) -> Self::Output {
        WinLoseCasesOdds {
            win: self.win * rhs,
            push: self.push * rhs,
            lose: self.lose * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_probabilities_sum_to_one() {
        let sum: f64 = CARD_VALUES.iter().map(|v| card_probability(*v)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
