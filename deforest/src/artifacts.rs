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

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::algorithms::LogisticParams;
use crate::errors::ArtifactError;
use crate::scalers::ScalerParams;

pub const MODEL_FILE: &str = "logistic_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const COLUMNS_FILE: &str = "model_columns.json";

/// The three artifacts written by training and read by the predictor: the
/// fitted model, the fitted scaler and the training column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub model: LogisticParams,
    pub scaler: ScalerParams,
    pub columns: Vec<String>,
}

impl ModelArtifacts {
    pub fn new(
        model: LogisticParams,
        scaler: ScalerParams,
        columns: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        let artifacts = ModelArtifacts { model, scaler, columns };
        artifacts.validate()?;
        Ok(artifacts)
    }

    /// Writes the artifacts as JSON files into `dir`, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), ArtifactError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|source| ArtifactError::Io { path: dir.to_path_buf(), source })?;

        write_json(&dir.join(MODEL_FILE), &self.model)?;
        write_json(&dir.join(SCALER_FILE), &self.scaler)?;
        write_json(&dir.join(COLUMNS_FILE), &self.columns)?;
        info!("Saved model artifacts to {}", dir.display());
        Ok(())
    }

    /// Reads and cross-checks the artifacts in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let model: LogisticParams = read_json(&dir.join(MODEL_FILE))?;
        let scaler: ScalerParams = read_json(&dir.join(SCALER_FILE))?;
        let columns: Vec<String> = read_json(&dir.join(COLUMNS_FILE))?;

        let artifacts = ModelArtifacts::new(model, scaler, columns)?;
        info!(
            "Loaded model artifacts from {} ({} features)",
            dir.display(),
            artifacts.columns.len()
        );
        Ok(artifacts)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.columns.len();
        if n == 0 {
            return Err(ArtifactError::Inconsistent("model column list is empty".to_string()));
        }
        if self.model.weights.len() != n {
            return Err(ArtifactError::Inconsistent(format!(
                "model has {} weights but there are {} model columns",
                self.model.weights.len(),
                n
            )));
        }
        if self.scaler.mean.len() != n || self.scaler.scale.len() != n {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler covers {} features but there are {} model columns",
                self.scaler.mean.len(),
                n
            )));
        }
        let mut seen = HashSet::with_capacity(n);
        if let Some(duplicate) = self.columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ArtifactError::Inconsistent(format!(
                "model column '{}' appears more than once",
                duplicate
            )));
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| ArtifactError::Malformed { path: path.to_path_buf(), source })?;
    fs::write(path, json).map_err(|source| ArtifactError::Io { path: path.to_path_buf(), source })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArtifactError::Missing { path: path.to_path_buf() },
        _ => ArtifactError::Io { path: path.to_path_buf(), source },
    })?;
    serde_json::from_str(&contents)
        .map_err(|source| ArtifactError::Malformed { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn artifacts() -> ModelArtifacts {
        ModelArtifacts::new(
            LogisticParams { weights: vec![0.5, -1.25], bias: 0.1 },
            ScalerParams { mean: vec![10.0, 0.0], scale: vec![2.0, 1.0] },
            vec!["Latitude".to_string(), "Region_SE Asia".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let saved = artifacts();
        saved.save(dir.path()).unwrap();

        assert!(dir.path().join(MODEL_FILE).exists());
        assert!(dir.path().join(SCALER_FILE).exists());
        assert!(dir.path().join(COLUMNS_FILE).exists());
        assert_eq!(ModelArtifacts::load(dir.path()).unwrap(), saved);
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("models").join("v1");
        artifacts().save(&nested).unwrap();
        assert!(nested.join(COLUMNS_FILE).exists());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        artifacts().save(dir.path()).unwrap();
        fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

        match ModelArtifacts::load(dir.path()) {
            Err(ArtifactError::Missing { path }) => assert!(path.ends_with(SCALER_FILE)),
            other => panic!("expected missing scaler, got {:?}", other),
        }
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempdir().unwrap();
        artifacts().save(dir.path()).unwrap();
        fs::write(dir.path().join(COLUMNS_FILE), "{not json").unwrap();

        assert!(matches!(
            ModelArtifacts::load(dir.path()),
            Err(ArtifactError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_weight_count_mismatch() {
        let result = ModelArtifacts::new(
            LogisticParams { weights: vec![0.5], bias: 0.0 },
            ScalerParams { mean: vec![0.0, 0.0], scale: vec![1.0, 1.0] },
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(matches!(result, Err(ArtifactError::Inconsistent(_))));
    }

    #[test]
    fn rejects_scaler_width_mismatch() {
        let result = ModelArtifacts::new(
            LogisticParams { weights: vec![0.5, 0.5], bias: 0.0 },
            ScalerParams { mean: vec![0.0], scale: vec![1.0] },
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(matches!(result, Err(ArtifactError::Inconsistent(_))));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let result = ModelArtifacts::new(
            LogisticParams { weights: vec![0.5, 0.5], bias: 0.0 },
            ScalerParams { mean: vec![0.0, 0.0], scale: vec![1.0, 1.0] },
            vec!["a".to_string(), "a".to_string()],
        );
        assert!(matches!(result, Err(ArtifactError::Inconsistent(msg)) if msg.contains("'a'")));
    }
}
