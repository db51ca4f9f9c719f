//! Command-line entrypoint: `train` fits and evaluates a model on a labeled export,
//! `predict` scores the sessions of a new export with the saved model.

use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use honeypot_recurrence::{
    config::PipelineConfig,
    logging::StructuredLogger,
    predict::run_predictor,
    training::{run_trainer, TrainOptions},
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Parse a yes/no style flag value (yes/no, true/false, t/f, y/n, 1/0).
fn parse_flag(v: &str) -> Result<bool, String> {
    match v.to_ascii_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err("Boolean value expected.".to_string()),
    }
}

#[derive(Parser, Debug)]
#[command(name = "honeypot-recurrence")]
#[command(about = "Predict recurring attacker IPs from honeypot session logs")]
struct Cli {
    /// Pipeline config JSON (defaults to $HONEYPOT_CONFIG_PATH or config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on new data
    Train {
        /// Path to JSON containing all examples
        #[arg(short = 'p', long)]
        path_to_json: PathBuf,

        /// Whether to save the model or not
        #[arg(short = 'm', long, default_value = "true", value_parser = parse_flag, action = ArgAction::Set)]
        save_model: bool,

        /// Whether to save the train and test data or not
        #[arg(short = 'd', long, default_value = "false", value_parser = parse_flag, action = ArgAction::Set)]
        save_data: bool,
    },
    /// Predict on new sessions
    Predict {
        /// Path to JSON containing the sessions to score
        #[arg(short = 'p', long)]
        path_to_json: PathBuf,

        /// Whether to save the processed data or not
        #[arg(short = 'd', long, default_value = "false", value_parser = parse_flag, action = ArgAction::Set)]
        save_data: bool,

        /// Print one JSON object per session instead of the label list
        #[arg(long)]
        json: bool,
    },
}

fn stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("HONEYPOT_CONFIG_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let (config, config_error) = match PipelineConfig::load(&config_path) {
        Ok(c) => (c, None),
        Err(e) => (PipelineConfig::default(), Some(e)),
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    if let Some(e) = config_error {
        warn!(config = %config_path.display(), error = %e, "ignoring invalid config, using defaults");
    }
    info!(config = %config_path.display(), artifacts_dir = ?config.artifacts_dir, "starting");

    match cli.command {
        Command::Train {
            path_to_json,
            save_model,
            save_data,
        } => {
            let report = run_trainer(
                &path_to_json,
                &config,
                TrainOptions {
                    save_model,
                    save_data,
                },
            )?;
            let ts = stamp();
            println!("{} Train: label 0: {}, label 1: {}", ts, report.negatives, report.positives);
            println!(
                "{} Train: train size: {} ({} ips), test size: {} ({} ips)",
                ts, report.train_rows, report.train_ips, report.test_rows, report.test_ips
            );
            println!("{} Train: precision_score on test: {}", ts, report.metrics.precision);
            println!("{} Train: recall_score on test: {}", ts, report.metrics.recall);
            println!(
                "{} Train: num fps: {}, fpr: {}",
                ts, report.metrics.false_positives, report.metrics.false_positive_rate
            );
            if let Some(path) = report.model_path {
                println!("{} Train: saved model => {}", ts, path.display());
            }
        }
        Command::Predict {
            path_to_json,
            save_data,
            json,
        } => {
            let predictions = run_predictor(&path_to_json, &config, save_data)?;
            if json {
                let mut out = std::io::stdout().lock();
                for p in &predictions {
                    StructuredLogger::emit_json(p, &mut out)?;
                }
            } else {
                let labels: Vec<usize> = predictions.iter().map(|p| p.label).collect();
                println!("{} Predict: {:?}", stamp(), labels);
            }
        }
    }

    Ok(())
}
