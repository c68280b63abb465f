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

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::algorithms::LogisticRegression;
use crate::artifacts::ModelArtifacts;
use crate::errors::{ArtifactError, PredictError};
use crate::features::{CATEGORICAL_COLUMNS, TileFeatures};
use crate::preprocessors::{align, one_hot_encode};
use crate::scalers::StandardScaler;

pub const NO_DEFORESTATION: &str = "No Deforestation";
pub const DEFORESTATION: &str = "Deforestation";

/// Two-class confidence for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub no_deforestation: f64,
    pub deforestation: f64,
}

impl Prediction {
    /// Both labels with their confidence, most likely first.
    pub fn ranked(&self) -> [(&'static str, f64); 2] {
        let no = (NO_DEFORESTATION, self.no_deforestation);
        let yes = (DEFORESTATION, self.deforestation);
        if self.deforestation > self.no_deforestation { [yes, no] } else { [no, yes] }
    }

    pub fn label(&self) -> &'static str {
        self.ranked()[0].0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.ranked();
        write!(f, "{}: {:.2}%, {}: {:.2}%", first.0, first.1 * 100.0, second.0, second.1 * 100.0)
    }
}

/// Scores tiles against a loaded model.
pub struct Predictor {
    model: LogisticRegression,
    scaler: StandardScaler,
    columns: Vec<String>,
}

impl Predictor {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        Predictor::new(ModelArtifacts::load(dir)?)
    }

    pub fn new(artifacts: ModelArtifacts) -> Result<Self, ArtifactError> {
        let ModelArtifacts { model, scaler, columns } = artifacts;
        Ok(Predictor {
            model: LogisticRegression::from_params(model)?,
            scaler: StandardScaler::from_params(scaler)?,
            columns,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Encodes the tile, reindexes it onto the model columns with zero fill,
    /// scales it and returns both class probabilities.
    pub fn predict(&self, tile: &TileFeatures) -> Result<Prediction, PredictError> {
        let frame = tile.to_frame()?;
        let encoded = one_hot_encode(&frame, &CATEGORICAL_COLUMNS, false)?;
        let alignment = align(&encoded, &self.columns)?;

        for column in &alignment.discarded {
            if !is_dummy(column) {
                warn!("Input column '{}' is not used by the model", column);
            }
        }
        if !alignment.zero_filled.is_empty() {
            debug!("Zero-filled model columns: {:?}", alignment.zero_filled);
        }

        let scaled = self.scaler.transform(&alignment.matrix)?;
        let proba = self.model.predict_proba(&scaled)?;
        let prediction =
            Prediction { no_deforestation: proba[[0, 0]], deforestation: proba[[0, 1]] };
        debug!("Prediction for {} / {}: {}", tile.region, tile.country, prediction);
        Ok(prediction)
    }
}

fn is_dummy(column: &str) -> bool {
    CATEGORICAL_COLUMNS.iter().any(|c| column.starts_with(&format!("{}_", c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::LogisticParams;
    use crate::config::TrainConfig;
    use crate::data::read_frame;
    use crate::features::{Country, NumericFeature, Region};
    use crate::scalers::ScalerParams;
    use crate::trainer::{synthetic_csv, train_frame};
    use tempfile::tempdir;

    fn init_logger() {
        let _ =
            env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
    }

    fn hand_built() -> Predictor {
        init_logger();
        // Only tree cover and the Congo Basin indicator carry weight.
        Predictor::new(
            ModelArtifacts::new(
                LogisticParams { weights: vec![-2.0, 1.0], bias: 0.0 },
                ScalerParams { mean: vec![50.0, 0.0], scale: vec![10.0, 1.0] },
                vec!["Tree Cover (%)".to_string(), "Region_Congo Basin".to_string()],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn ranked_orders_by_confidence() {
        let p = Prediction { no_deforestation: 0.3, deforestation: 0.7 };
        assert_eq!(p.ranked(), [(DEFORESTATION, 0.7), (NO_DEFORESTATION, 0.3)]);
        assert_eq!(p.label(), DEFORESTATION);
        assert_eq!(p.to_string(), "Deforestation: 70.00%, No Deforestation: 30.00%");
    }

    #[test]
    fn predict_uses_aligned_and_scaled_features() {
        let predictor = hand_built();
        let tile = TileFeatures::new(Region::Amazon, Country::Brazil)
            .with(NumericFeature::TreeCover, 50.0);

        // Tree cover at the mean and Amazon zero-filled gives z = 0.
        let p = predictor.predict(&tile).unwrap();
        assert!((p.deforestation - 0.5).abs() < 1e-12);
        assert!((p.no_deforestation + p.deforestation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn predict_one_hot_region_reaches_model() {
        let predictor = hand_built();
        let tile = TileFeatures::new(Region::CongoBasin, Country::Gabon)
            .with(NumericFeature::TreeCover, 50.0);

        let p = predictor.predict(&tile).unwrap();
        let expected = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((p.deforestation - expected).abs() < 1e-12);
    }

    #[test]
    fn low_tree_cover_raises_risk() {
        let predictor = hand_built();
        let dense = TileFeatures::new(Region::Amazon, Country::Peru)
            .with(NumericFeature::TreeCover, 90.0);
        let cleared = dense.clone().with(NumericFeature::TreeCover, 10.0);

        let dense = predictor.predict(&dense).unwrap();
        let cleared = predictor.predict(&cleared).unwrap();
        assert_eq!(dense.label(), NO_DEFORESTATION);
        assert_eq!(cleared.label(), DEFORESTATION);
    }

    #[test]
    fn trained_artifacts_round_trip_through_disk() {
        init_logger();
        let data = read_frame(synthetic_csv(true).as_bytes()).unwrap();
        let (artifacts, _) = train_frame(&data, &TrainConfig::new("unused")).unwrap();
        let dir = tempdir().unwrap();
        artifacts.save(dir.path()).unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        assert_eq!(predictor.columns(), artifacts.columns.as_slice());

        let risky = TileFeatures::new(Region::SeAsia, Country::Indonesia)
            .with(NumericFeature::TreeCover, 5.0)
            .with(NumericFeature::DistanceToRoad, 1.0);
        let safe = TileFeatures::new(Region::Amazon, Country::Brazil)
            .with(NumericFeature::TreeCover, 95.0)
            .with(NumericFeature::DistanceToRoad, 10.0);

        assert!(predictor.predict(&risky).unwrap().deforestation > 0.5);
        assert!(predictor.predict(&safe).unwrap().deforestation < 0.5);
    }

    #[test]
    fn load_fails_without_artifacts() {
        init_logger();
        let dir = tempdir().unwrap();
        assert!(matches!(Predictor::load(dir.path()), Err(ArtifactError::Missing { .. })));
    }
}
