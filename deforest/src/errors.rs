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

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("Duplicate column '{0}' in CSV header")]
    DuplicateColumn(String),

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("Failed to build frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Failed to download dataset from {url}: {source}")]
    Download { url: String, source: reqwest::Error },
}

#[derive(Error, Debug, PartialEq)]
pub enum FrameError {
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Row has {actual} values, expected {expected}")]
    RowLength { expected: usize, actual: usize },

    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Column '{column}' has non-numeric value '{value}' at row {row}")]
    NonNumeric { column: String, row: usize, value: String },

    #[error("Failed to shape data into array: {0}")]
    ArrayShape(#[from] ndarray::ShapeError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ScalerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Scaler parameters are invalid: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum LossError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,

    #[error("Predictions must lie in [0, 1]")]
    InvalidPredictionRange,

    #[error("Actual values must be 0 or 1")]
    InvalidActualValue,
}

#[derive(Error, Debug, PartialEq)]
pub enum OptimizerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Input has zero samples")]
    ZeroSamples,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,

    #[error("Gradient became NaN or infinite")]
    NumericalInstability,
}

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Label {0} is not a binary class label (expected 0 or 1)")]
    InvalidLabel(f64),

    #[error("Training labels contain a single class; both 0 and 1 are required")]
    SingleClass,

    #[error("Model parameters are invalid: {0}")]
    InvalidParams(String),

    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Loss error: {0}")]
    Loss(#[from] LossError),
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact file {} not found", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to access artifact {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Artifact {} is malformed: {source}", path.display())]
    Malformed { path: PathBuf, source: serde_json::Error },

    #[error("Artifacts are inconsistent: {0}")]
    Inconsistent(String),

    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("{label}: a value is required")]
    Empty { label: String },

    #[error("{label}: '{input}' is not a number")]
    NotANumber { label: String, input: String },

    #[error("{label}: value must be finite")]
    NotFinite { label: String },
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Data error: {0}")]
    Csv(#[from] CsvError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Target column '{0}' not found")]
    MissingTarget(String),

    #[error("No training rows after splitting the dataset")]
    NoTrainingRows,

    #[error("No feature columns left after dropping non-feature columns")]
    NoFeatures,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
