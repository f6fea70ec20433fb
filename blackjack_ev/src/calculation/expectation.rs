use log::debug;
use serde::Serialize;

use super::{card_probability, dealer_outcome_distribution, OutcomeDistribution, CARD_VALUES};
use crate::{BlackjackError, HandTotal, Rule, TotalArray};

/// Every expectation table of a player hand facing one dealer up card.
///
/// All values are the expected profit per unit of the original bet. The hit
/// tables assume the player keeps playing optimally (hit or stand) after the
/// card is drawn. The double tables take exactly one card and stand, and are
/// already scaled by the doubled bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectationTables {
    pub up_card: u8,
    pub dealer_odds: OutcomeDistribution,
    pub stand: TotalArray<f64>,       // 4 to 21, plus natural
    pub hit: TotalArray<f64>,         // Hard 2 to 21
    pub soft_hit: TotalArray<f64>,    // Soft 12 to 21
    pub double: TotalArray<f64>,      // Hard 2 to 21
    pub soft_double: TotalArray<f64>, // Soft 12 to 21
    pub split: TotalArray<f64>,       // Pair card value 2 to 11
}

impl ExpectationTables {
    pub fn calculate(rule: &Rule, up_card: u8) -> Result<ExpectationTables, BlackjackError> {
        let dealer_odds = dealer_outcome_distribution(Some(up_card))?;
        let stand = stand_table(&dealer_odds, rule.payout_blackjack);
        let hard_hit = hard_hit_table(&stand, false);
        let soft_hit = soft_hit_table(&stand, &hard_hit, false);
        let soft_double = soft_hit_table(&stand, &hard_hit, true);
        let double = total_hit_table(&stand, hard_hit_table(&stand, true), &soft_hit, true);
        let hit = total_hit_table(&stand, hard_hit, &soft_hit, false);
        let split = split_table(rule, &stand, &hit, &soft_hit);

        debug!(
            "Up card {}: dealer bust {:.6}, natural {:.6}",
            up_card, dealer_odds.p_bust, dealer_odds.p_blackjack
        );

        Ok(ExpectationTables {
            up_card,
            dealer_odds,
            stand,
            hit,
            soft_hit,
            double,
            soft_double,
            split,
        })
    }
}

/// Expectation of standing on each total from 4 to 21, and of a natural.
pub fn stand_ev(rule: &Rule, up_card: u8) -> Result<TotalArray<f64>, BlackjackError> {
    let dealer_odds = dealer_outcome_distribution(Some(up_card))?;
    Ok(stand_table(&dealer_odds, rule.payout_blackjack))
}

/// Expectation of hitting a hard total from 11 to 21.
pub fn hit_ev(
    rule: &Rule,
    up_card: u8,
    double_down: bool,
) -> Result<TotalArray<f64>, BlackjackError> {
    let stand = stand_ev(rule, up_card)?;
    Ok(hard_hit_table(&stand, double_down))
}

/// Expectation of hitting a soft total from 12 to 21.
pub fn soft_hit_ev(
    rule: &Rule,
    up_card: u8,
    double_down: bool,
) -> Result<TotalArray<f64>, BlackjackError> {
    let stand = stand_ev(rule, up_card)?;
    let hard_hit = hard_hit_table(&stand, false);
    Ok(soft_hit_table(&stand, &hard_hit, double_down))
}

/// Expectation of hitting a hard total from 2 to 21.
pub fn total_hit_ev(
    rule: &Rule,
    up_card: u8,
    double_down: bool,
) -> Result<TotalArray<f64>, BlackjackError> {
    let stand = stand_ev(rule, up_card)?;
    let hard_hit = hard_hit_table(&stand, false);
    let soft_hit = soft_hit_table(&stand, &hard_hit, false);
    if double_down {
        Ok(total_hit_table(&stand, hard_hit_table(&stand, true), &soft_hit, true))
    } else {
        Ok(total_hit_table(&stand, hard_hit, &soft_hit, false))
    }
}

/// Expectation of splitting a pair, keyed by the value of one card of the pair.
pub fn split_ev(rule: &Rule, up_card: u8) -> Result<TotalArray<f64>, BlackjackError> {
    Ok(ExpectationTables::calculate(rule, up_card)?.split)
}

fn stand_table(dealer_odds: &OutcomeDistribution, payout_blackjack: f64) -> TotalArray<f64> {
    let mut stand: TotalArray<f64> = TotalArray::new();
    for total in 4..=21 {
        let odds = dealer_odds.stand_odds(total);
        stand.insert(total, odds.win - odds.lose);
    }
    // A dealer natural pushes against a player natural.
    stand.set_natural(payout_blackjack * (1.0 - dealer_odds.p_blackjack));
    stand
}

/// Totals strictly descend from 21, so every lookup hits an entry that is already final.
fn hard_hit_table(stand: &TotalArray<f64>, double_down: bool) -> TotalArray<f64> {
    let mut hit: TotalArray<f64> = TotalArray::new();
    for total in (11..=21).rev() {
        let mut ex = 0.0;
        for value in CARD_VALUES {
            let next = HandTotal::new(total, false).add_card_value(value);
            let next_ex = if next.is_bust() {
                -1.0
            } else if double_down {
                stand[next.total]
            } else {
                hit[next.total].max(stand[next.total])
            };
            ex += card_probability(value) * next_ex;
        }
        hit.insert(total, if double_down { 2.0 * ex } else { ex });
    }
    hit
}

/// Requires the non-double hard table from 11 to 21. A soft total that overflows
/// turns into a hard one instead of busting.
fn soft_hit_table(
    stand: &TotalArray<f64>,
    hard_hit: &TotalArray<f64>,
    double_down: bool,
) -> TotalArray<f64> {
    let mut soft_hit: TotalArray<f64> = TotalArray::new();
    for total in (12..=21).rev() {
        let mut ex = 0.0;
        for value in CARD_VALUES {
            let next = HandTotal::new(total, true).add_card_value(value);
            let next_ex = if next.is_bust() {
                -1.0
            } else if double_down {
                stand[next.total]
            } else if next.is_soft() {
                soft_hit[next.total]
                    .max(hard_hit[next.total])
                    .max(stand[next.total])
            } else {
                hard_hit[next.total].max(stand[next.total])
            };
            ex += card_probability(value) * next_ex;
        }
        soft_hit.insert(total, if double_down { 2.0 * ex } else { ex });
    }
    soft_hit
}

/// Extends a hard table from 11 to 21 down to 2. Drawing an Ace below 11 makes the hand soft.
fn total_hit_table(
    stand: &TotalArray<f64>,
    hard_hit: TotalArray<f64>,
    soft_hit: &TotalArray<f64>,
    double_down: bool,
) -> TotalArray<f64> {
    let mut hit = hard_hit;
    for total in (2..=10).rev() {
        let mut ex = 0.0;
        for value in CARD_VALUES {
            let next = HandTotal::new(total, false).add_card_value(value);
            let next_ex = if double_down {
                stand[next.total]
            } else if next.is_soft() {
                soft_hit[next.total].max(stand[next.total])
            } else {
                hit[next.total].max(stand[next.total])
            };
            ex += card_probability(value) * next_ex;
        }
        hit.insert(total, if double_down { 2.0 * ex } else { ex });
    }
    hit
}

/// Each split hand receives one card, then hits or stands optimally. No resplit
/// and no double after split. Split Aces stand on their card unless the rule
/// allows decisions after splitting Aces.
fn split_table(
    rule: &Rule,
    stand: &TotalArray<f64>,
    hit: &TotalArray<f64>,
    soft_hit: &TotalArray<f64>,
) -> TotalArray<f64> {
    let mut split: TotalArray<f64> = TotalArray::new();
    for pair_value in CARD_VALUES {
        let single = HandTotal::default().add_card_value(pair_value);
        let mut ex = 0.0;
        for value in CARD_VALUES {
            let next = single.add_card_value(value);
            let next_ex = if pair_value == 11 && !rule.allow_decisions_after_split_aces {
                stand[next.total]
            } else if next.is_soft() {
                soft_hit[next.total].max(stand[next.total])
            } else {
                hit[next.total].max(stand[next.total])
            };
            ex += card_probability(value) * next_ex;
        }
        split.insert(pair_value, 2.0 * ex);
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_typical_rule() -> Rule {
        Rule {
            number_of_decks: 8,
            double_policy: crate::DoublePolicy::AnyTwo,
            allow_decisions_after_split_aces: false,
            payout_blackjack: 1.5,
        }
    }

    fn assert_close(lhs: f64, rhs: f64, tolerance: f64) {
        assert!(
            (lhs - rhs).abs() < tolerance,
            "{} and {} differ by more than {}",
            lhs,
            rhs,
            tolerance
        );
    }

    #[test]
    fn stand_is_monotonic_in_player_total() {
        let rule = get_typical_rule();
        for up_card in CARD_VALUES {
            let stand = stand_ev(&rule, up_card).unwrap();
            for total in 4..21 {
                assert!(stand[total + 1] >= stand[total] - 1e-12);
            }
        }
        let stand = stand_ev(&rule, 10).unwrap();
        assert!(stand[21] > stand[17]);
    }

    #[test]
    fn natural_pays_unless_dealer_has_one_too() {
        let rule = get_typical_rule();
        assert_close(*stand_ev(&rule, 6).unwrap().natural().unwrap(), 1.5, 1e-12);
        assert_close(
            *stand_ev(&rule, 10).unwrap().natural().unwrap(),
            1.5 * 12.0 / 13.0,
            1e-12,
        );
        let rule = Rule {
            payout_blackjack: 1.2,
            ..rule
        };
        assert_close(
            *stand_ev(&rule, 11).unwrap().natural().unwrap(),
            1.2 * 9.0 / 13.0,
            1e-12,
        );
    }

    #[test]
    fn hitting_hard_21_always_busts() {
        let rule = get_typical_rule();
        for up_card in CARD_VALUES {
            assert_close(hit_ev(&rule, up_card, false).unwrap()[21], -1.0, 1e-12);
            assert_close(hit_ev(&rule, up_card, true).unwrap()[21], -2.0, 1e-12);
        }
    }

    #[test]
    fn tables_are_fixed_points() {
        let rule = get_typical_rule();
        for up_card in CARD_VALUES {
            let tables = ExpectationTables::calculate(&rule, up_card).unwrap();
            let stand = &tables.stand;

            for total in 2..=21 {
                let mut ex = 0.0;
                for value in CARD_VALUES {
                    let next = HandTotal::new(total, false).add_card_value(value);
                    ex += card_probability(value)
                        * if next.is_bust() {
                            -1.0
                        } else if next.is_soft() {
                            tables.soft_hit[next.total].max(stand[next.total])
                        } else {
                            tables.hit[next.total].max(stand[next.total])
                        };
                }
                assert_close(tables.hit[total], ex, 1e-12);
            }

            for total in 12..=21 {
                let mut ex = 0.0;
                for value in CARD_VALUES {
                    let next = HandTotal::new(total, true).add_card_value(value);
                    ex += card_probability(value)
                        * if next.is_soft() {
                            tables.soft_hit[next.total]
                                .max(tables.hit[next.total])
                                .max(stand[next.total])
                        } else {
                            tables.hit[next.total].max(stand[next.total])
                        };
                }
                assert_close(tables.soft_hit[total], ex, 1e-12);
            }
        }
    }

    #[test]
    fn calculation_is_idempotent() {
        let rule = get_typical_rule();
        for up_card in CARD_VALUES {
            let first = ExpectationTables::calculate(&rule, up_card).unwrap();
            let second = ExpectationTables::calculate(&rule, up_card).unwrap();
            assert_eq!(first, second);
            assert_eq!(stand_ev(&rule, up_card).unwrap(), first.stand);
            assert_eq!(total_hit_ev(&rule, up_card, false).unwrap(), first.hit);
            assert_eq!(total_hit_ev(&rule, up_card, true).unwrap(), first.double);
            assert_eq!(soft_hit_ev(&rule, up_card, true).unwrap(), first.soft_double);
        }
    }

    #[test]
    fn soft_hand_hits_better_than_hard_hand() {
        let rule = get_typical_rule();
        for up_card in CARD_VALUES {
            let hard = hit_ev(&rule, up_card, false).unwrap();
            let soft = soft_hit_ev(&rule, up_card, false).unwrap();
            for total in 12..=21 {
                assert!(soft[total] >= hard[total]);
            }
        }
    }

    #[test]
    fn known_expectations() {
        let rule = get_typical_rule();
        let tables = ExpectationTables::calculate(&rule, 10).unwrap();
        assert_close(tables.stand[16], -0.5757818468, 1e-9);
        assert_close(tables.hit[16], -0.5752243196, 1e-9);
        assert!(tables.hit[16] > tables.stand[16]);

        let tables = ExpectationTables::calculate(&rule, 6).unwrap();
        assert_close(tables.stand[12], -0.1536990158, 1e-9);
        assert_close(tables.hit[11], 0.3336900475, 1e-9);
        assert_close(tables.double[11], 0.6673800949, 1e-9);
        assert_close(tables.hit[2], 0.0388834119, 1e-9);
        assert_close(tables.soft_hit[12], 0.1859536133, 1e-9);
        assert_close(tables.split[8], 0.2299203002, 1e-9);
        // One card on each Ace draws the same totals as doubling a hard 11.
        assert_close(tables.split[11], tables.double[11], 1e-12);
    }

    #[test]
    fn doubled_hand_loses_double_stake_to_dealer_natural() {
        let rule = get_typical_rule();
        let tables = ExpectationTables::calculate(&rule, 11).unwrap();
        // Every stand entry already charges the dealer natural, and doubling scales it by two.
        assert_close(tables.double[11], -0.5398809986, 1e-9);
        let mut stand_after_one_card = 0.0;
        for value in CARD_VALUES {
            let next = HandTotal::new(11, false).add_card_value(value);
            stand_after_one_card += card_probability(value) * tables.stand[next.total];
        }
        assert_close(tables.double[11], 2.0 * stand_after_one_card, 1e-12);
        assert_close(tables.split[11], tables.double[11], 1e-12);
    }

    #[test]
    fn decisions_after_split_aces_only_help() {
        let rule = get_typical_rule();
        let free_rule = Rule {
            allow_decisions_after_split_aces: true,
            ..rule
        };
        let restricted = split_ev(&rule, 11).unwrap();
        let free = split_ev(&free_rule, 11).unwrap();
        assert_close(restricted[11], -0.5398809986, 1e-9);
        assert_close(free[11], -0.2019115672, 1e-9);
        for pair_value in 2..=10 {
            assert_eq!(restricted[pair_value], free[pair_value]);
        }
    }

    #[test]
    fn invalid_up_card() {
        let rule = get_typical_rule();
        assert_eq!(
            ExpectationTables::calculate(&rule, 0),
            Err(BlackjackError::InvalidUpCard(0))
        );
        assert!(hit_ev(&rule, 12, false).is_err());
    }
}
