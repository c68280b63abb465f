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

use log::{debug, info};
use ndarray::{Array1, Array2, Axis, stack};
use serde::{Deserialize, Serialize};

use crate::errors::{LossError, ModelError};
use crate::losses::{CrossEntropy, LossFunction};
use crate::optimizers::{Optimizer, RegularizedLogisticGradientDescent};

/// Serializable state of a fitted [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

pub struct LogisticRegressionBuilder {
    loss_function: Box<dyn LossFunction>,
    optimizer: Box<dyn Optimizer>,
    tolerance: f64,
}

impl LogisticRegressionBuilder {
    pub fn optimizer(mut self, optimizer: impl Optimizer + 'static) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    pub fn loss_function(mut self, loss_function: impl LossFunction + 'static) -> Self {
        self.loss_function = Box::new(loss_function);
        self
    }

    /// Gradient descent stops once every gradient component is below this.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn build(self) -> LogisticRegression {
        LogisticRegression {
            weights: Array1::zeros(0),
            bias: 0.0,
            fitted: false,
            loss_function: self.loss_function,
            optimizer: self.optimizer,
            tolerance: self.tolerance,
        }
    }
}

/// Binary logistic regression trained with full-batch gradient descent.
///
/// Inputs are expected to be scaled already; the model itself does not
/// normalise features.
pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
    fitted: bool,
    loss_function: Box<dyn LossFunction>,
    optimizer: Box<dyn Optimizer>,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new() -> LogisticRegressionBuilder {
        LogisticRegressionBuilder {
            loss_function: Box::new(CrossEntropy),
            optimizer: Box::new(RegularizedLogisticGradientDescent::default()),
            tolerance: 1e-4,
        }
    }

    /// Restores a fitted model from its parameters.
    pub fn from_params(params: LogisticParams) -> Result<Self, ModelError> {
        if params.weights.is_empty() {
            return Err(ModelError::InvalidParams("model has no weights".to_string()));
        }
        if params.weights.iter().any(|w| !w.is_finite()) || !params.bias.is_finite() {
            return Err(ModelError::InvalidParams("parameters must be finite".to_string()));
        }
        let mut model = LogisticRegression::new().build();
        model.weights = Array1::from_vec(params.weights);
        model.bias = params.bias;
        model.fitted = true;
        Ok(model)
    }

    pub fn params(&self) -> Result<LogisticParams, ModelError> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        Ok(LogisticParams { weights: self.weights.to_vec(), bias: self.bias })
    }

    pub fn n_features(&self) -> Option<usize> {
        self.fitted.then(|| self.weights.len())
    }

    /// Fits the model from zero weights and returns the number of iterations
    /// run. Labels must be 0 or 1 and both classes must be present.
    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        learning_rate: f64,
        max_iter: usize,
    ) -> Result<usize, ModelError> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        if let Some(&label) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(ModelError::InvalidLabel(label));
        }
        if y.iter().all(|&v| v == y[0]) {
            return Err(ModelError::SingleClass);
        }

        self.weights = Array1::zeros(x.ncols());
        self.bias = 0.0;

        let mut iterations = 0;
        let mut converged = false;
        for epoch in 0..max_iter {
            let (grad_weights, grad_bias) =
                self.optimizer.compute_gradients(x, y, &self.weights, self.bias)?;
            let max_grad = grad_weights.iter().fold(grad_bias.abs(), |acc, g| acc.max(g.abs()));

            self.weights -= &(grad_weights * learning_rate);
            self.bias -= grad_bias * learning_rate;
            iterations = epoch + 1;

            if epoch % 100 == 0 {
                debug!("Iteration {}: max |gradient| = {:.6}", epoch, max_grad);
            }
            if max_grad < self.tolerance {
                converged = true;
                break;
            }
        }
        if converged {
            info!("Converged after {} iterations", iterations);
        } else {
            info!("Stopped at the iteration limit ({}) before converging", max_iter);
        }

        self.fitted = true;
        Ok(iterations)
    }

    /// Probability of the positive class for each row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        if x.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.ncols() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                actual: x.ncols(),
            });
        }
        let linear_output = self.predict_linear(x);
        Ok(self.sigmoid(&linear_output))
    }

    /// Class probabilities as an `n × 2` matrix with columns `[P(0), P(1)]`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        let positive = self.predict(x)?;
        let negative = positive.mapv(|p| 1.0 - p);
        stack(Axis(1), &[negative.view(), positive.view()])
            .map_err(|e| ModelError::InvalidParams(e.to_string()))
    }

    pub fn calculate_loss(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, LossError> {
        self.loss_function.calculate(predictions, actuals)
    }

    /// Share of rows where the 0.5-thresholded prediction equals the label.
    pub fn calculate_accuracy(&self, predictions: &Array1<f64>, actuals: &Array1<f64>) -> f64 {
        if actuals.is_empty() {
            return 0.0;
        }
        let correct = predictions
            .iter()
            .zip(actuals.iter())
            .filter(|&(&p, &y)| (if p >= 0.5 { 1.0 } else { 0.0 }) == y)
            .count();
        correct as f64 / actuals.len() as f64
    }

    #[inline(always)]
    fn predict_linear(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.bias
    }

    #[inline(always)]
    fn sigmoid(&self, z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|x| 1.0 / (1.0 + (-x).exp()))
    }
}
