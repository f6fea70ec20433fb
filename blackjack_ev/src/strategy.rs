use std::collections::BTreeMap;

use blackjack_ev_macros::BestExpectation;
use serde::Serialize;

use crate::{
    calculation::ExpectationTables, check_up_card, BlackjackError, Decision, Hand, Rule,
    TotalArray, UP_CARDS,
};

pub trait BestExpectation {
    /// Returns the highest expectation and its decision. Ties go to the decision listed first.
    fn get_max_expectation(&self) -> (f64, Decision);
}

/// Expectations of the decisions available on a hand that was not split.
/// A double that the rule forbids has an expectation of negative infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, BestExpectation)]
pub struct ActionExpectation {
    pub stand: f64,
    pub hit: f64,
    pub double: f64,
}

impl ActionExpectation {
    pub fn without_double(self) -> Self {
        ActionExpectation {
            double: f64::NEG_INFINITY,
            ..self
        }
    }
}

/// Everything needed to play a hand against one dealer up card.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyChart {
    pub up_card: u8,
    pub natural: f64,
    pub hard: TotalArray<ActionExpectation>, // 4 to 21
    pub soft: TotalArray<ActionExpectation>, // 12 to 21
    pub split: TotalArray<f64>,              // Pair card value 2 to 11
}

impl StrategyChart {
    pub fn calculate(rule: &Rule, up_card: u8) -> Result<StrategyChart, BlackjackError> {
        let tables = ExpectationTables::calculate(rule, up_card)?;
        Ok(Self::from_tables(rule, &tables))
    }

    pub fn from_tables(rule: &Rule, tables: &ExpectationTables) -> StrategyChart {
        let double_or_forbidden = |total: u8, is_soft: bool, ex: f64| {
            if rule.double_policy.allows(total, is_soft) {
                ex
            } else {
                f64::NEG_INFINITY
            }
        };

        let mut hard = TotalArray::new();
        for total in 4..=21 {
            hard.insert(
                total,
                ActionExpectation {
                    stand: tables.stand[total],
                    hit: tables.hit[total],
                    double: double_or_forbidden(total, false, tables.double[total]),
                },
            );
        }
        let mut soft = TotalArray::new();
        for total in 12..=21 {
            soft.insert(
                total,
                ActionExpectation {
                    stand: tables.stand[total],
                    hit: tables.soft_hit[total],
                    double: double_or_forbidden(total, true, tables.soft_double[total]),
                },
            );
        }

        StrategyChart {
            up_card: tables.up_card,
            natural: tables.stand.natural().copied().unwrap_or_default(),
            hard,
            soft,
            split: tables.split.clone(),
        }
    }

    /// A pair of Aces is compared against a soft 12, any other pair against twice its value.
    pub fn should_split(&self, pair_value: u8) -> bool {
        let unsplit = if pair_value == 11 {
            self.soft[12].get_max_expectation().0
        } else {
            self.hard[pair_value * 2].get_max_expectation().0
        };
        self.split[pair_value] > unsplit
    }

    pub fn optimal_expectations(&self) -> TotalArray<f64> {
        let mut table = map_values(&self.hard, |ex| ex.get_max_expectation().0);
        table.set_natural(self.natural);
        table
    }

    pub fn optimal_soft_expectations(&self) -> TotalArray<f64> {
        map_values(&self.soft, |ex| ex.get_max_expectation().0)
    }

    pub fn decisions(&self) -> TotalArray<Decision> {
        let mut table = map_values(&self.hard, |ex| ex.get_max_expectation().1);
        table.set_natural(Decision::Stand);
        table
    }

    pub fn soft_decisions(&self) -> TotalArray<Decision> {
        map_values(&self.soft, |ex| ex.get_max_expectation().1)
    }

    pub fn split_decisions(&self) -> TotalArray<bool> {
        let mut table = TotalArray::new();
        for (pair_value, _) in self.split.iter() {
            table.insert(pair_value, self.should_split(pair_value));
        }
        table
    }
}

fn map_values<T, U>(table: &TotalArray<T>, f: impl Fn(&T) -> U) -> TotalArray<U> {
    let mut mapped = TotalArray::new();
    for (total, value) in table.iter() {
        mapped.insert(total, f(value));
    }
    mapped
}

fn collect_by_up_card<T>(
    rule: &Rule,
    up_cards: &[u8],
    f: impl Fn(&StrategyChart) -> T,
) -> Result<BTreeMap<u8, T>, BlackjackError> {
    up_cards
        .iter()
        .map(|up_card| {
            let chart = StrategyChart::calculate(rule, *up_card)?;
            Ok((*up_card, f(&chart)))
        })
        .collect()
}

/// Expectation of the best decision on each hard total, and of a natural.
pub fn optimal_expectation_table(
    rule: &Rule,
    up_cards: &[u8],
) -> Result<BTreeMap<u8, TotalArray<f64>>, BlackjackError> {
    collect_by_up_card(rule, up_cards, StrategyChart::optimal_expectations)
}

pub fn optimal_soft_expectation_table(
    rule: &Rule,
    up_cards: &[u8],
) -> Result<BTreeMap<u8, TotalArray<f64>>, BlackjackError> {
    collect_by_up_card(rule, up_cards, StrategyChart::optimal_soft_expectations)
}

pub fn optimal_strategy_table(
    rule: &Rule,
    up_cards: &[u8],
) -> Result<BTreeMap<u8, TotalArray<Decision>>, BlackjackError> {
    collect_by_up_card(rule, up_cards, StrategyChart::decisions)
}

pub fn optimal_soft_strategy_table(
    rule: &Rule,
    up_cards: &[u8],
) -> Result<BTreeMap<u8, TotalArray<Decision>>, BlackjackError> {
    collect_by_up_card(rule, up_cards, StrategyChart::soft_decisions)
}

pub fn optimal_split_table(
    rule: &Rule,
    up_cards: &[u8],
) -> Result<BTreeMap<u8, TotalArray<bool>>, BlackjackError> {
    collect_by_up_card(rule, up_cards, StrategyChart::split_decisions)
}

/// Charts for every dealer up card, computed once.
#[derive(Debug, Clone)]
pub struct BasicStrategy {
    charts: BTreeMap<u8, StrategyChart>,
}

impl BasicStrategy {
    pub fn calculate(rule: &Rule) -> Result<BasicStrategy, BlackjackError> {
        let charts = collect_by_up_card(rule, &UP_CARDS, StrategyChart::clone)?;
        Ok(BasicStrategy { charts })
    }

    pub fn chart(&self, up_card: u8) -> Result<&StrategyChart, BlackjackError> {
        self.charts
            .get(&check_up_card(up_card)?)
            .ok_or(BlackjackError::InvalidUpCard(up_card))
    }

    /// Double is only offered on the first two cards, and split only on a pair.
    pub fn make_decision(&self, up_card: u8, hand: &Hand) -> Result<Decision, BlackjackError> {
        let chart = self.chart(up_card)?;
        if hand.is_natural() {
            return Ok(Decision::Stand);
        }

        let cards = hand.cards();
        if cards.len() == 2
            && cards[0].value() == cards[1].value()
            && chart.should_split(cards[0].value())
        {
            return Ok(Decision::Split);
        }

        let total = hand.hand_total();
        let table = if total.is_soft() {
            &chart.soft
        } else {
            &chart.hard
        };
        let expectation = *table
            .get(total.total)
            .ok_or(BlackjackError::InvalidPlayerTotal(total.total))?;
        let expectation = if cards.len() == 2 {
            expectation
        } else {
            expectation.without_double()
        };
        Ok(expectation.get_max_expectation().1)
    }
}
