use std::fs::{self, File};
use std::path::PathBuf;

use clap::Parser;
use deforest::tui::{ARTIFACTS_NOT_LOADED, init_tui};
use deforest::{Predictor, TileFeatures};
use log::{error, info};

/// Interactive deforestation risk form backed by the trained artifacts.
#[derive(Parser, Debug)]
#[command(name = "deforest-risk", version, about)]
struct Args {
    /// Directory holding logistic_model.json, scaler.json and model_columns.json
    #[arg(short, long, default_value = ".")]
    artifacts: PathBuf,

    /// Log file for the interactive form, which owns the terminal
    #[arg(long, default_value = "deforest-risk.log")]
    log_file: PathBuf,

    /// Predict once for the tile in this JSON file and print the result
    #[arg(long)]
    features: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let env = env_logger::Env::default().default_filter_or("info");

    match args.features {
        Some(path) => {
            env_logger::Builder::from_env(env).init();
            let predictor = Predictor::load(&args.artifacts)?;
            let tile: TileFeatures = serde_json::from_str(&fs::read_to_string(&path)?)?;
            let prediction = predictor.predict(&tile)?;
            for (label, confidence) in prediction.ranked() {
                println!("{}: {:.4}", label, confidence);
            }
        }
        None => {
            let log_file = File::create(&args.log_file)?;
            env_logger::Builder::from_env(env)
                .target(env_logger::Target::Pipe(Box::new(log_file)))
                .init();

            let predictor = match Predictor::load(&args.artifacts) {
                Ok(predictor) => {
                    info!("Model artifacts loaded from {}", args.artifacts.display());
                    Some(predictor)
                }
                Err(e) => {
                    error!("Error loading model artifacts: {}", e);
                    eprintln!("{} ({})", ARTIFACTS_NOT_LOADED, args.log_file.display());
                    None
                }
            };
            init_tui(predictor)?;
        }
    }

    Ok(())
}
