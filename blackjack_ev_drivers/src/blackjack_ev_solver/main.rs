mod report;

use std::error::Error;

use blackjack_ev_drivers::parse_config_from_file;
use clap::Parser;
use log::info;

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_ev.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Skip the Monte Carlo cross-check
    #[arg(long)]
    skip_monte_carlo: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = CommandLineArgs::parse();
    if args.config == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().ok_or("Cannot find home directory")?;
        let config_file_path = home_dir.join(".blackjack_ev.yml");
        if !config_file_path.exists() {
            return Err("Config file not exists".into());
        }
        if config_file_path.is_dir() {
            return Err("This should be a path rather than a directory".into());
        }
        args.config = config_file_path.to_string_lossy().into_owned();
    }
    let args = args;

    let config = parse_config_from_file(&args.config)?;
    info!("Loaded config from {}", args.config);
    let rule: blackjack_ev::Rule = config.rule.try_into()?;

    let mut report = report::solve(&rule, &config.solver)?;
    if !args.skip_monte_carlo {
        report.monte_carlo = Some(report::cross_check(&rule, &config.monte_carlo)?);
    }
    println!("{}", serde_yaml::to_string(&report)?);
    Ok(())
}
