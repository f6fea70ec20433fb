pub mod trial;

use std::thread;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use self::trial::{PlayerSpot, TrialResult, TrialTable};
use crate::calculation::WinLoseCasesOdds;
use crate::{BlackjackError, Hand, Rule};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCounts {
    pub wins: u64,
    pub pushes: u64,
    pub losses: u64,
}

impl TrialCounts {
    pub fn record(&mut self, result: TrialResult) {
        match result {
            TrialResult::Win => self.wins += 1,
            TrialResult::Push => self.pushes += 1,
            TrialResult::Lose => self.losses += 1,
        }
    }

    pub fn merge(&mut self, other: &TrialCounts) {
        self.wins += other.wins;
        self.pushes += other.pushes;
        self.losses += other.losses;
    }

    pub fn trials(&self) -> u64 {
        self.wins + self.pushes + self.losses
    }

    pub fn odds(&self) -> Result<WinLoseCasesOdds, BlackjackError> {
        let trials = self.trials();
        if trials == 0 {
            return Err(BlackjackError::ZeroTrials);
        }
        let trials = trials as f64;
        Ok(WinLoseCasesOdds {
            win: self.wins as f64 / trials,
            push: self.pushes as f64 / trials,
            lose: self.losses as f64 / trials,
        })
    }

    /// Average profit of a unit bet paid even money.
    pub fn expectation(&self) -> Result<f64, BlackjackError> {
        Ok(self.odds()?.expectation())
    }
}

/// Estimates win, push and lose proportions by playing trials on a finite deck.
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    rule: Rule,
    number_of_threads: usize,
    seed: Option<u64>,
}

impl MonteCarlo {
    /// Zero threads means one thread per available core. Without a seed, every
    /// random generator is seeded from the operating system.
    pub fn new(rule: &Rule, number_of_threads: usize, seed: Option<u64>) -> Self {
        let number_of_threads = {
            if number_of_threads == 0 {
                let parallelism = thread::available_parallelism();
                match parallelism {
                    Ok(n) => n.get(),
                    Err(_) => 1,
                }
            } else {
                number_of_threads
            }
        };
        MonteCarlo {
            rule: *rule,
            number_of_threads,
            seed,
        }
    }

    pub fn number_of_threads(&self) -> usize {
        self.number_of_threads
    }

    pub fn stand(
        &self,
        trials: u64,
        player_total: u8,
        up_card: u8,
    ) -> Result<WinLoseCasesOdds, BlackjackError> {
        let table = TrialTable::new(&self.rule, PlayerSpot::StandOn(player_total), up_card)?;
        self.run_sequential(trials, table)?.odds()
    }

    pub fn stand_parallel(
        &self,
        trials: u64,
        player_total: u8,
        up_card: u8,
    ) -> Result<WinLoseCasesOdds, BlackjackError> {
        let table = TrialTable::new(&self.rule, PlayerSpot::StandOn(player_total), up_card)?;
        self.run_parallel(trials, &table)?.odds()
    }

    pub fn hit(
        &self,
        trials: u64,
        player_hand: &Hand,
        up_card: u8,
    ) -> Result<WinLoseCasesOdds, BlackjackError> {
        let table = TrialTable::new(&self.rule, PlayerSpot::HitOnce(player_hand.clone()), up_card)?;
        self.run_sequential(trials, table)?.odds()
    }

    pub fn hit_parallel(
        &self,
        trials: u64,
        player_hand: &Hand,
        up_card: u8,
    ) -> Result<WinLoseCasesOdds, BlackjackError> {
        let table = TrialTable::new(&self.rule, PlayerSpot::HitOnce(player_hand.clone()), up_card)?;
        self.run_parallel(trials, &table)?.odds()
    }

    /// Plays every trial on the given table one after another.
    pub fn run_sequential(
        &self,
        trials: u64,
        mut table: TrialTable,
    ) -> Result<TrialCounts, BlackjackError> {
        if trials == 0 {
            return Err(BlackjackError::ZeroTrials);
        }
        info!("Running {} trials on 1 thread", trials);

        let mut rng = make_rng(self.seed, 0);
        let mut counts = TrialCounts::default();
        for _ in 0..trials {
            counts.record(table.play_once(&mut rng)?);
        }

        log_counts(&counts);
        Ok(counts)
    }

    /// Splits the trials between workers. Each worker owns a copy of the table
    /// and its own random generator. Counts are merged after every worker joins.
    pub fn run_parallel(
        &self,
        trials: u64,
        table: &TrialTable,
    ) -> Result<TrialCounts, BlackjackError> {
        if trials == 0 {
            return Err(BlackjackError::ZeroTrials);
        }
        let workers = (self.number_of_threads as u64).min(trials);
        info!("Running {} trials on {} threads", trials, workers);

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let share = trials / workers + u64::from(worker < trials % workers);
                let mut table = table.clone();
                let mut rng = make_rng(self.seed, worker);
                thread::spawn(move || -> Result<TrialCounts, BlackjackError> {
                    let mut counts = TrialCounts::default();
                    for _ in 0..share {
                        counts.record(table.play_once(&mut rng)?);
                    }
                    Ok(counts)
                })
            })
            .collect();

        let mut counts = TrialCounts::default();
        for handle in handles {
            let worker_counts = handle
                .join()
                .map_err(|_| BlackjackError::WorkerPanicked)??;
            counts.merge(&worker_counts);
        }

        log_counts(&counts);
        Ok(counts)
    }
}

fn make_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

fn log_counts(counts: &TrialCounts) {
    if let Ok(odds) = counts.odds() {
        info!(
            "{:<16}{:<16}{:<16}{:<16}",
            format!("trials {}", counts.trials()),
            format!("win {:.4}", odds.win),
            format!("push {:.4}", odds.push),
            format!("lose {:.4}", odds.lose),
        );
    }
}

/// Win, push and lose proportions of standing on `player_total`, on one thread.
pub fn monte_carlo_stand(
    rule: &Rule,
    trials: u64,
    player_total: u8,
    up_card: u8,
) -> Result<WinLoseCasesOdds, BlackjackError> {
    MonteCarlo::new(rule, 1, None).stand(trials, player_total, up_card)
}

pub fn monte_carlo_stand_parallel(
    rule: &Rule,
    trials: u64,
    player_total: u8,
    up_card: u8,
) -> Result<WinLoseCasesOdds, BlackjackError> {
    MonteCarlo::new(rule, 0, None).stand_parallel(trials, player_total, up_card)
}

/// Win, push and lose proportions of taking one card on `player_hand` and standing.
pub fn monte_carlo_hit(
    rule: &Rule,
    trials: u64,
    player_hand: &Hand,
    up_card: u8,
) -> Result<WinLoseCasesOdds, BlackjackError> {
    MonteCarlo::new(rule, 1, None).hit(trials, player_hand, up_card)
}

pub fn monte_carlo_hit_parallel(
    rule: &Rule,
    trials: u64,
    player_hand: &Hand,
    up_card: u8,
) -> Result<WinLoseCasesOdds, BlackjackError> {
    MonteCarlo::new(rule, 0, None).hit_parallel(trials, player_hand, up_card)
}
