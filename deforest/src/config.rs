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

use std::path::{Path, PathBuf};

use crate::data::DataSource;

/// Configuration for a training run.
///
/// Defaults mirror an L2-penalised logistic regression with inverse strength
/// `C = 1`, at most 1000 iterations and a gradient tolerance of `1e-4`.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    data: DataSource,
    output_dir: PathBuf,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    inverse_regularization: f64,
    train_ratio: f64,
    seed: u64,
}

impl TrainConfig {
    pub fn new(data: impl Into<DataSource>) -> Self {
        TrainConfig {
            data: data.into(),
            output_dir: PathBuf::from("."),
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-4,
            inverse_regularization: 1.0,
            train_ratio: 0.8,
            seed: 42,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_inverse_regularization(mut self, c: f64) -> Self {
        self.inverse_regularization = c;
        self
    }

    /// Share of rows used for training when the dataset has no split column.
    pub fn with_train_ratio(mut self, ratio: f64) -> Self {
        self.train_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn data(&self) -> &DataSource {
        &self.data
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn inverse_regularization(&self) -> f64 {
        self.inverse_regularization
    }

    pub fn train_ratio(&self) -> f64 {
        self.train_ratio
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
