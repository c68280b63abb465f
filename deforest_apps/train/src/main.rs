use std::path::PathBuf;

use clap::Parser;
use deforest::{TrainConfig, train_and_save};
use log::info;

/// Fits the deforestation classifier and writes its artifacts.
#[derive(Parser, Debug)]
#[command(name = "deforest-train", version, about)]
struct Args {
    /// Labelled tile CSV, as a local path or an http(s) URL
    #[arg(long, default_value = "deforestation.csv")]
    data: String,

    /// Directory that receives logistic_model.json, scaler.json and model_columns.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Gradient descent step size
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Maximum number of gradient descent iterations
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,

    /// Stop once every gradient component is below this
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f64,

    /// Inverse L2 regularization strength
    #[arg(short = 'C', long, default_value_t = 1.0)]
    inverse_regularization: f64,

    /// Seed for the random split used when the data has no split column
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Training share for the random split
    #[arg(long, default_value_t = 0.8)]
    train_ratio: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = TrainConfig::new(args.data.as_str())
        .with_output_dir(args.output_dir)
        .with_learning_rate(args.learning_rate)
        .with_max_iter(args.max_iter)
        .with_tolerance(args.tolerance)
        .with_inverse_regularization(args.inverse_regularization)
        .with_seed(args.seed)
        .with_train_ratio(args.train_ratio);

    let report = train_and_save(&config)?;

    info!("Model columns ({}): {:?}", report.columns.len(), report.columns);
    println!(
        "Trained on {} rows in {} iterations: accuracy {:.2}%, log loss {:.6}",
        report.train.rows,
        report.iterations,
        report.train.accuracy * 100.0,
        report.train.log_loss
    );
    if let Some(holdout) = report.holdout {
        println!(
            "Holdout ({} rows): accuracy {:.2}%, log loss {:.6}",
            holdout.rows,
            holdout.accuracy * 100.0,
            holdout.log_loss
        );
    }
    println!("Artifacts written to {}", config.output_dir().display());

    Ok(())
}
