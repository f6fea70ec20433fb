use std::fs;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub solver: ConfigSolver,
    pub monte_carlo: ConfigMonteCarlo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub double_policy: String,
    pub allow_decisions_after_split_aces: bool,

    pub payout_blackjack: f64,
}

impl TryInto<blackjack_ev::Rule> for ConfigRule {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<blackjack_ev::Rule, Self::Error> {
        let rule = blackjack_ev::Rule {
            number_of_decks: self.number_of_decks,
            double_policy: self.double_policy.parse()?,
            allow_decisions_after_split_aces: self.allow_decisions_after_split_aces,
            payout_blackjack: self.payout_blackjack,
        };

        Ok(rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSolver {
    pub up_cards: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMonteCarlo {
    pub number_of_threads: usize,
    pub trials: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    pub player_total: u8,
    pub dealer_up_card: u8,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid rule: {0}")]
    Rule(#[from] serde::de::value::Error),
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename)?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}
