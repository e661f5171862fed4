//! AU Features Learner command line interface
//!
//! Trains a linear SVM on an extracted feature CSV and exports the model
//! as JSON.

use au_learner::pipeline::{run_training, TrainingConfig, TrainingReport};
use au_learner::VERSION;
use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "au-learner")]
#[command(about = "Train a linear SVM on audio features and export it as JSON")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Features CSV (header row, label in the last column)
    #[arg(short = 'i', value_name = "FEATURES_CSV")]
    input: PathBuf,

    /// Exported model JSON, overwritten if present
    #[arg(short = 'o', value_name = "EXPORT_JSON")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    println!("AU Features Learner v{VERSION}");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                process::exit(0);
            }
            _ => {
                eprint!("{e}");
                process::exit(1);
            }
        },
    };

    let log_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    println!("Learning W/ Features from: \"{}\"", cli.input.display());
    println!("Exporting Model to: \"{}\"", cli.output.display());
    println!("Searching and training Model to the best parameters (can be long)");

    match run_training(&cli.input, &cli.output, &TrainingConfig::default()) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("Error: {e}");
            debug!("{e:?}");
            process::exit(1);
        }
    }
}

fn print_report(report: &TrainingReport) {
    println!("{}", report.best_candidate());
    println!("Model Accuracy: {}%", format_percent(report.accuracy));
    println!("Confusion matrix (normalized over true labels):");
    print!("{}", report.confusion.display(&report.labels()));
}

/// Percentage with at least one decimal place: `100.0`, `87.5`
fn format_percent(fraction: f64) -> String {
    format!("{:?}", fraction * 100.0)
}
