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

//! Deforestation risk prediction for land tiles.
//!
//! Training fits a standard scaler and an L2-penalised logistic regression on
//! a labelled tile export and writes three artifacts: the model, the scaler
//! and the training column order. Prediction rebuilds a single tile in the
//! training layout (one-hot encoding, reindexing with zero fill, scaling) and
//! returns the probability of each class.

pub mod algorithms;
pub mod artifacts;
pub mod config;
pub mod data;
pub mod errors;
pub mod features;
pub mod form;
pub mod losses;
pub mod optimizers;
pub mod predictor;
pub mod preprocessors;
pub mod scalers;
pub mod trainer;
pub mod tui;

pub use artifacts::ModelArtifacts;
pub use config::TrainConfig;
pub use data::DataSource;
pub use features::{Country, NumericFeature, Region, TileFeatures};
pub use predictor::{Prediction, Predictor};
pub use trainer::{TrainReport, train_and_save};
