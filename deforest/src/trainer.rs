// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use log::{debug, info, warn};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::algorithms::LogisticRegression;
use crate::artifacts::ModelArtifacts;
use crate::config::TrainConfig;
use crate::data::frame::{Frame, Value, numeric_cell};
use crate::errors::{ModelError, TrainError};
use crate::features::CATEGORICAL_COLUMNS;
use crate::optimizers::RegularizedLogisticGradientDescent;
use crate::preprocessors::one_hot_encode;
use crate::scalers::StandardScaler;

pub const TARGET_COLUMN: &str = "Deforestation Event (Yes=1,No=0)";
pub const SPLIT_COLUMN: &str = "Dataset Split";

/// Identifier, bookkeeping and leakage columns that never become features.
pub const NON_FEATURE_COLUMNS: [&str; 8] = [
    "Tile ID",
    "Image ID",
    "Date",
    SPLIT_COLUMN,
    "Image File Path",
    "Predicted Risk Score",
    "Biome Type",
    TARGET_COLUMN,
];

#[derive(Debug, Clone, PartialEq)]
pub struct EvalMetrics {
    pub rows: usize,
    pub accuracy: f64,
    pub log_loss: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub columns: Vec<String>,
    pub iterations: usize,
    pub train: EvalMetrics,
    pub holdout: Option<EvalMetrics>,
}

/// Loads the configured dataset, fits the scaler and the model, and writes
/// the three artifacts into the configured output directory.
pub fn train_and_save(config: &TrainConfig) -> Result<TrainReport, TrainError> {
    info!("Loading training data from {}", config.data());
    let frame = config.data().load()?;
    let (artifacts, report) = train_frame(&frame, config)?;
    artifacts.save(config.output_dir())?;
    Ok(report)
}

/// Trains on an in-memory frame without touching the filesystem.
pub fn train_frame(
    frame: &Frame,
    config: &TrainConfig,
) -> Result<(ModelArtifacts, TrainReport), TrainError> {
    if !frame.has_column(TARGET_COLUMN) {
        return Err(TrainError::MissingTarget(TARGET_COLUMN.to_string()));
    }

    let encoded = one_hot_encode(frame, &CATEGORICAL_COLUMNS, true)?;
    let (train_rows, holdout_rows) = split_rows(&encoded, config)?;
    if train_rows.n_rows() == 0 {
        return Err(TrainError::NoTrainingRows);
    }

    let (x_train, y_train, columns) = features_and_target(train_rows)?;
    if columns.is_empty() {
        return Err(TrainError::NoFeatures);
    }
    info!("Training on {} rows with {} feature columns", x_train.nrows(), columns.len());
    debug!("Model columns: {:?}", columns);

    let mut scaler = StandardScaler::new();
    let x_scaled = scaler.fit_transform(&x_train)?;

    let mut model = LogisticRegression::new()
        .optimizer(RegularizedLogisticGradientDescent::new(config.inverse_regularization()))
        .tolerance(config.tolerance())
        .build();
    let iterations = model.fit(&x_scaled, &y_train, config.learning_rate(), config.max_iter())?;

    let train = evaluate(&model, &x_scaled, &y_train)?;
    info!(
        "Train accuracy: {:.2}%, log loss: {:.6}",
        train.accuracy * 100.0,
        train.log_loss
    );

    let holdout = match holdout_rows {
        Some(rows) if rows.n_rows() > 0 => {
            let (x_holdout, y_holdout, _) = features_and_target(rows)?;
            let metrics = evaluate(&model, &scaler.transform(&x_holdout)?, &y_holdout)?;
            info!(
                "Holdout accuracy on {} rows: {:.2}%, log loss: {:.6}",
                metrics.rows,
                metrics.accuracy * 100.0,
                metrics.log_loss
            );
            Some(metrics)
        }
        _ => {
            warn!("No holdout rows; skipping evaluation");
            None
        }
    };

    let artifacts = ModelArtifacts::new(model.params()?, scaler.params()?, columns.clone())?;
    Ok((artifacts, TrainReport { columns, iterations, train, holdout }))
}

/// Splits rows into training and holdout sets. A `Dataset Split` column
/// decides when present (`train` / `test`); otherwise rows are shuffled with
/// the configured seed and cut at the train ratio.
fn split_rows(frame: &Frame, config: &TrainConfig) -> Result<(Frame, Option<Frame>), TrainError> {
    if frame.has_column(SPLIT_COLUMN) {
        let is = |label: &'static str| move |v: &Value| matches!(v, Value::Text(s) if s == label);
        let train = frame.filter_rows(SPLIT_COLUMN, is("train"))?;
        let test = frame.filter_rows(SPLIT_COLUMN, is("test"))?;
        debug!("Split column selects {} train and {} test rows", train.n_rows(), test.n_rows());
        return Ok((train, Some(test)));
    }

    warn!(
        "No '{}' column; using a seeded {:.0}% random split",
        SPLIT_COLUMN,
        config.train_ratio() * 100.0
    );
    let mut indices: Vec<usize> = (0..frame.n_rows()).collect();
    let mut rng = StdRng::seed_from_u64(config.seed());
    indices.shuffle(&mut rng);
    let cut = (frame.n_rows() as f64 * config.train_ratio()).round() as usize;
    let (train, holdout) = indices.split_at(cut);
    Ok((frame.take_rows(train), Some(frame.take_rows(holdout))))
}

fn features_and_target(
    mut frame: Frame,
) -> Result<(Array2<f64>, Array1<f64>, Vec<String>), TrainError> {
    let target = frame.split_off_column(TARGET_COLUMN)?;
    frame.drop_columns(&NON_FEATURE_COLUMNS);

    let labels = target
        .iter()
        .enumerate()
        .map(|(i, v)| numeric_cell(TARGET_COLUMN, frame.row_number(i), v))
        .collect::<Result<Vec<f64>, _>>()?;
    let x = frame.to_matrix()?;
    Ok((x, Array1::from_vec(labels), frame.columns().to_vec()))
}

fn evaluate(
    model: &LogisticRegression,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<EvalMetrics, TrainError> {
    let predictions = model.predict(x)?;
    let log_loss = model.calculate_loss(&predictions, y).map_err(ModelError::from)?;
    let accuracy = model.calculate_accuracy(&predictions, y);
    Ok(EvalMetrics { rows: y.len(), accuracy, log_loss })
}

/// A small labelled dataset in the layout of the real tile export: risk is
/// high where tree cover is low.
#[cfg(test)]
pub(crate) fn synthetic_csv(with_split: bool) -> String {
    let regions = [("Amazon", "Brazil"), ("Congo Basin", "Gabon"), ("SE Asia", "Indonesia")];
    let mut csv = String::from(
        "Tile ID,Date,Latitude,Tree Cover (%),Distance to Road (km),\
         \"Protected Area (1=Yes,0=No)\",Region,Country,Biome Type,",
    );
    if with_split {
        csv.push_str("Dataset Split,");
    }
    csv.push_str("\"Deforestation Event (Yes=1,No=0)\"\n");

    for i in 0..40 {
        let tree_cover = (i % 10) as f64 * 10.0;
        let label = if tree_cover < 45.0 { 1 } else { 0 };
        let road = if label == 1 { 1.0 + (i % 3) as f64 } else { 8.0 + (i % 4) as f64 };
        let latitude = ((i * 7) % 13) as f64 - 6.0;
        let (region, country) = regions[i % 3];
        csv.push_str(&format!(
            "T{i},2024-01-{:02},{latitude},{tree_cover},{road},{},{region},{country},Tropical,",
            i % 28 + 1,
            i % 2
        ));
        if with_split {
            csv.push_str(if i % 5 == 0 { "test," } else { "train," });
        }
        csv.push_str(&format!("{label}\n"));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{COLUMNS_FILE, MODEL_FILE, SCALER_FILE};
    use crate::data::read_frame;
    use crate::errors::FrameError;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn init_logger() {
        let _ =
            env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
    }

    fn frame(with_split: bool) -> Frame {
        init_logger();
        read_frame(synthetic_csv(with_split).as_bytes()).unwrap()
    }

    fn train_csv(csv: &str) -> Result<(ModelArtifacts, TrainReport), TrainError> {
        init_logger();
        let data = read_frame(csv.as_bytes()).unwrap();
        train_frame(&data, &TrainConfig::new("unused"))
    }

    #[test]
    fn train_uses_split_column_and_drops_non_features() {
        let (artifacts, report) = train_frame(&frame(true), &TrainConfig::new("unused")).unwrap();

        assert_eq!(
            report.columns,
            vec![
                "Latitude",
                "Tree Cover (%)",
                "Distance to Road (km)",
                "Protected Area (1=Yes,0=No)",
                "Region_Congo Basin",
                "Region_SE Asia",
                "Country_Gabon",
                "Country_Indonesia",
            ]
        );
        assert_eq!(artifacts.columns, report.columns);
        assert_eq!(report.train.rows, 32);
        assert_eq!(report.holdout.as_ref().map(|h| h.rows), Some(8));
        assert!(report.train.accuracy >= 0.9, "train accuracy {}", report.train.accuracy);
        assert!(report.holdout.unwrap().accuracy >= 0.75);
    }

    #[test]
    fn train_without_split_column_uses_seeded_ratio() {
        let config = TrainConfig::new("unused").with_train_ratio(0.75).with_seed(7);
        let (first, report) = train_frame(&frame(false), &config).unwrap();
        let (second, _) = train_frame(&frame(false), &config).unwrap();

        assert_eq!(report.train.rows, 30);
        assert_eq!(report.holdout.map(|h| h.rows), Some(10));
        assert_eq!(first, second);
    }

    #[test]
    fn train_requires_target() {
        let mut data = frame(true);
        data.drop_columns(&[TARGET_COLUMN]);
        let result = train_frame(&data, &TrainConfig::new("unused"));
        assert!(matches!(result, Err(TrainError::MissingTarget(_))));
    }

    #[test]
    fn train_requires_training_rows() {
        let csv = synthetic_csv(true).replace(",train,", ",test,");
        let result = train_csv(&csv);
        assert!(matches!(result, Err(TrainError::NoTrainingRows)));
    }

    #[test]
    fn train_reports_non_numeric_feature_at_csv_row() {
        // T1 is the second data row and a training row; T0 goes to the holdout.
        let csv = synthetic_csv(true).replacen("T1,2024-01-02,1,", "T1,2024-01-02,north,", 1);
        match train_csv(&csv) {
            Err(TrainError::Frame(FrameError::NonNumeric { column, row, value })) => {
                assert_eq!(column, "Latitude");
                assert_eq!(row, 2);
                assert_eq!(value, "north");
            }
            other => panic!("expected a non-numeric Latitude, got {:?}", other.map(|(_, r)| r)),
        }
    }

    #[test]
    fn train_reports_nan_cell_as_missing() {
        let csv = synthetic_csv(true).replacen("T1,2024-01-02,1,", "T1,2024-01-02,NaN,", 1);
        match train_csv(&csv) {
            Err(TrainError::Frame(FrameError::MissingValue { column, row })) => {
                assert_eq!(column, "Latitude");
                assert_eq!(row, 2);
            }
            other => panic!("expected a missing Latitude, got {:?}", other.map(|(_, r)| r)),
        }
    }

    #[test]
    fn shuffled_split_reports_csv_row() {
        // T7 is the eighth data row wherever the shuffle puts it.
        let csv = synthetic_csv(false).replacen("T7,2024-01-08,4,", "T7,2024-01-08,,", 1);
        match train_csv(&csv) {
            Err(TrainError::Frame(FrameError::MissingValue { column, row })) => {
                assert_eq!(column, "Latitude");
                assert_eq!(row, 8);
            }
            other => panic!("expected a missing Latitude, got {:?}", other.map(|(_, r)| r)),
        }
    }

    #[test]
    fn train_and_save_writes_artifacts() {
        init_logger();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(synthetic_csv(true).as_bytes()).unwrap();
        file.flush().unwrap();
        let out = tempdir().unwrap();

        let config =
            TrainConfig::new(file.path().to_path_buf()).with_output_dir(out.path().join("model"));
        let report = train_and_save(&config).unwrap();

        let dir = out.path().join("model");
        for name in [MODEL_FILE, SCALER_FILE, COLUMNS_FILE] {
            assert!(dir.join(name).exists(), "{} missing", name);
        }
        let loaded = ModelArtifacts::load(&dir).unwrap();
        assert_eq!(loaded.columns, report.columns);
    }
}
