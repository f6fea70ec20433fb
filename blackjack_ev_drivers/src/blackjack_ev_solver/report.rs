use std::collections::BTreeMap;

use blackjack_ev::calculation::{dealer_outcome_distribution, OutcomeDistribution, WinLoseCasesOdds};
use blackjack_ev::simulation::MonteCarlo;
use blackjack_ev::strategy::StrategyChart;
use blackjack_ev::{BlackjackError, Decision, Rule, TotalArray};
use blackjack_ev_drivers::{ConfigMonteCarlo, ConfigSolver};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub dealer_odds: BTreeMap<String, OutcomeDistribution>,
    pub hard: BTreeMap<u8, TotalArray<Decision>>,
    pub soft: BTreeMap<u8, TotalArray<Decision>>,
    pub split: BTreeMap<u8, TotalArray<bool>>,
    pub hard_expectation: BTreeMap<u8, TotalArray<f64>>,
    pub soft_expectation: BTreeMap<u8, TotalArray<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct MonteCarloReport {
    pub trials: u64,
    pub number_of_threads: usize,
    pub player_total: u8,
    pub dealer_up_card: u8,
    pub exact: WinLoseCasesOdds,
    pub sequential: WinLoseCasesOdds,
    pub parallel: WinLoseCasesOdds,
}

pub fn solve(rule: &Rule, solver: &ConfigSolver) -> Result<Report, BlackjackError> {
    let mut dealer_odds = BTreeMap::new();
    dealer_odds.insert(String::from("any"), dealer_outcome_distribution(None)?);

    let mut report = Report {
        dealer_odds,
        hard: BTreeMap::new(),
        soft: BTreeMap::new(),
        split: BTreeMap::new(),
        hard_expectation: BTreeMap::new(),
        soft_expectation: BTreeMap::new(),
        monte_carlo: None,
    };

    for &up_card in &solver.up_cards {
        info!("Solving up card {}", up_card);
        let chart = StrategyChart::calculate(rule, up_card)?;
        report.dealer_odds.insert(
            up_card.to_string(),
            dealer_outcome_distribution(Some(up_card))?,
        );
        report.hard.insert(up_card, chart.decisions());
        report.soft.insert(up_card, chart.soft_decisions());
        report.split.insert(up_card, chart.split_decisions());
        report.hard_expectation.insert(up_card, chart.optimal_expectations());
        report.soft_expectation.insert(up_card, chart.optimal_soft_expectations());
    }

    Ok(report)
}

/// Estimates standing on the configured total both ways and compares with the exact odds.
pub fn cross_check(
    rule: &Rule,
    config: &ConfigMonteCarlo,
) -> Result<MonteCarloReport, BlackjackError> {
    let monte_carlo = MonteCarlo::new(rule, config.number_of_threads, config.seed);
    let exact = dealer_outcome_distribution(Some(config.dealer_up_card))?
        .stand_odds(config.player_total);
    let sequential = monte_carlo.stand(config.trials, config.player_total, config.dealer_up_card)?;
    let parallel =
        monte_carlo.stand_parallel(config.trials, config.player_total, config.dealer_up_card)?;

    info!(
        "{:<32}{:<32}",
        format!("exact expectation {:.6}", exact.expectation()),
        format!("simulated expectation {:.6}", parallel.expectation())
    );

    Ok(MonteCarloReport {
        trials: config.trials,
        number_of_threads: monte_carlo.number_of_threads(),
        player_total: config.player_total,
        dealer_up_card: config.dealer_up_card,
        exact,
        sequential,
        parallel,
    })
}
