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

use ndarray::{Array1, Array2};

use crate::errors::OptimizerError;

pub trait Optimizer {
    fn compute_gradients(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &Array1<f64>,
        bias: f64,
    ) -> Result<(Array1<f64>, f64), OptimizerError>;
}

/// Gradient of the mean binary log loss.
pub struct LogisticGradientDescent;

impl Optimizer for LogisticGradientDescent {
    fn compute_gradients(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &Array1<f64>,
        bias: f64,
    ) -> Result<(Array1<f64>, f64), OptimizerError> {
        validate_inputs(x, y, weights, bias)?;
        log_loss_gradients(x, y, weights, bias)
    }
}

/// Gradient of the mean binary log loss plus an L2 penalty on the weights.
///
/// `c` is the inverse regularization strength: the penalised objective is
/// `mean(log_loss) + ||w||² / (2 · c · n_samples)`, which is the
/// `c · sum(log_loss) + ||w||² / 2` objective rescaled by `1 / (c · n)`.
/// The bias is not penalised.
pub struct RegularizedLogisticGradientDescent {
    pub c: f64,
}

impl RegularizedLogisticGradientDescent {
    pub fn new(c: f64) -> Self {
        RegularizedLogisticGradientDescent { c }
    }
}

impl Default for RegularizedLogisticGradientDescent {
    fn default() -> Self {
        RegularizedLogisticGradientDescent { c: 1.0 }
    }
}

impl Optimizer for RegularizedLogisticGradientDescent {
    fn compute_gradients(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &Array1<f64>,
        bias: f64,
    ) -> Result<(Array1<f64>, f64), OptimizerError> {
        validate_inputs(x, y, weights, bias)?;
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(OptimizerError::InvalidNumericValue);
        }

        let (grad_weights, grad_bias) = log_loss_gradients(x, y, weights, bias)?;
        let penalty = weights / (self.c * x.nrows() as f64);
        let grad_weights = grad_weights + penalty;

        if !grad_weights.iter().all(|&v| v.is_finite()) {
            return Err(OptimizerError::NumericalInstability);
        }
        Ok((grad_weights, grad_bias))
    }
}

fn validate_inputs(
    x: &Array2<f64>,
    y: &Array1<f64>,
    weights: &Array1<f64>,
    bias: f64,
) -> Result<(), OptimizerError> {
    if x.is_empty() || y.is_empty() {
        return Err(OptimizerError::EmptyInput);
    }

    if x.nrows() == 0 {
        return Err(OptimizerError::ZeroSamples);
    }

    if x.ncols() != weights.len() {
        return Err(OptimizerError::DimensionMismatch {
            expected: x.ncols(),
            actual: weights.len(),
        });
    }

    if x.nrows() != y.len() {
        return Err(OptimizerError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
    }

    if x.iter().any(|&v| !v.is_finite())
        || y.iter().any(|&v| !v.is_finite())
        || weights.iter().any(|&v| !v.is_finite())
        || !bias.is_finite()
    {
        return Err(OptimizerError::InvalidNumericValue);
    }
    Ok(())
}

fn log_loss_gradients(
    x: &Array2<f64>,
    y: &Array1<f64>,
    weights: &Array1<f64>,
    bias: f64,
) -> Result<(Array1<f64>, f64), OptimizerError> {
    let linear_output = x.dot(weights) + bias;
    let predictions = linear_output.mapv(|z| 1.0 / (1.0 + (-z).exp()));
    let errors = &predictions - y;
    let grad_weights = x.t().dot(&errors) / x.nrows() as f64;
    let grad_bias = errors.mean().ok_or(OptimizerError::NumericalInstability)?;

    if !grad_weights.iter().all(|&v| v.is_finite()) || !grad_bias.is_finite() {
        return Err(OptimizerError::NumericalInstability);
    }

    Ok((grad_weights, grad_bias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logistic_gradients_at_zero_weights() {
        let x = array![[1.0], [-1.0]];
        let y = array![1.0, 0.0];
        let weights = array![0.0];

        let (grad_w, grad_b) =
            LogisticGradientDescent.compute_gradients(&x, &y, &weights, 0.0).unwrap();

        // sigmoid(0) = 0.5, errors = [-0.5, 0.5]
        assert!((grad_w[0] - (-0.5)).abs() < 1e-12);
        assert!(grad_b.abs() < 1e-12);
    }

    #[test]
    fn test_regularized_adds_weight_penalty() {
        let x = array![[1.0], [-1.0]];
        let y = array![1.0, 0.0];
        let weights = array![2.0];

        let (plain_w, plain_b) =
            LogisticGradientDescent.compute_gradients(&x, &y, &weights, 0.0).unwrap();
        let (reg_w, reg_b) = RegularizedLogisticGradientDescent::new(0.5)
            .compute_gradients(&x, &y, &weights, 0.0)
            .unwrap();

        // penalty = w / (c * n) = 2.0 / (0.5 * 2)
        assert!((reg_w[0] - plain_w[0] - 2.0).abs() < 1e-12);
        assert_eq!(reg_b, plain_b);
    }

    #[test]
    fn test_empty_input() {
        let x: Array2<f64> = Array2::zeros((0, 1));
        let y: Array1<f64> = Array1::zeros(0);
        let result = LogisticGradientDescent.compute_gradients(&x, &y, &array![0.0], 0.0);
        assert_eq!(result, Err(OptimizerError::EmptyInput));
    }

    #[test]
    fn test_weight_dimension_mismatch() {
        let x = array![[1.0, 2.0]];
        let y = array![1.0];
        let result = LogisticGradientDescent.compute_gradients(&x, &y, &array![0.0], 0.0);
        assert_eq!(result, Err(OptimizerError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_label_dimension_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        let result = LogisticGradientDescent.compute_gradients(&x, &y, &array![0.0], 0.0);
        assert_eq!(result, Err(OptimizerError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_non_finite_input() {
        let x = array![[f64::NAN]];
        let y = array![1.0];
        let result = LogisticGradientDescent.compute_gradients(&x, &y, &array![0.0], 0.0);
        assert_eq!(result, Err(OptimizerError::InvalidNumericValue));
    }

    #[test]
    fn test_invalid_regularization_strength() {
        let x = array![[1.0]];
        let y = array![1.0];
        let result = RegularizedLogisticGradientDescent::new(0.0)
            .compute_gradients(&x, &y, &array![0.0], 0.0);
        assert_eq!(result, Err(OptimizerError::InvalidNumericValue));
    }
}
