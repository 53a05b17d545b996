use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tiltplan::{AppConfig, init_logging};

#[derive(Parser, Debug)]
#[command(name = "tiltplan")]
#[command(about = "Relative-momentum regime analysis with lump-sum and periodic simulations")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Directory for tiltplan.log (default: ~/.tiltplan/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the configured pair from CSV price files
    Run {
        /// Path to the config file (default: ~/.tiltplan/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Root of the <TICKER>/price/daily_prices.csv tree
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Also write every output as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Analyse a seeded synthetic SPY/QQQ pair
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of trading days to generate
        #[arg(long, default_value_t = 2520)]
        days: usize,

        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the default configuration as YAML
    InitConfig {
        /// Destination (default: ~/.tiltplan/config.yaml)
        path: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_dir = args.log_dir.unwrap_or_else(AppConfig::default_home);

    init_logging(&log_dir, &args.log_level)?;

    match args.command {
        Command::Run {
            config,
            data_dir,
            json,
        } => {
            let path = config.unwrap_or_else(AppConfig::default_path);
            let config = AppConfig::load(&path)?;
            tiltplan::run(&config, data_dir, json.as_deref())?;
        }
        Command::Demo { seed, days, json } => {
            tiltplan::demo(seed, days, json.as_deref())?;
        }
        Command::InitConfig { path } => {
            tiltplan::init_config(&path.unwrap_or_else(AppConfig::default_path))?;
        }
    }

    tracing::info!("tiltplan finished");
    Ok(())
}
