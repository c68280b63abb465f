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

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::errors::ScalerError;

/// Serializable state of a fitted [`StandardScaler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Standardises each feature column to zero mean and unit variance.
///
/// The scale is the population standard deviation. Columns with zero variance
/// get a scale of 1 so they are centred but not divided.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler { mean: None, scale: None }
    }

    pub fn from_params(params: ScalerParams) -> Result<Self, ScalerError> {
        if params.mean.len() != params.scale.len() {
            return Err(ScalerError::InvalidParams(format!(
                "mean has {} entries but scale has {}",
                params.mean.len(),
                params.scale.len()
            )));
        }
        if params.mean.iter().any(|m| !m.is_finite()) {
            return Err(ScalerError::InvalidParams("mean must be finite".to_string()));
        }
        if params.scale.iter().any(|&s| !s.is_finite() || s <= 0.0) {
            return Err(ScalerError::InvalidParams(
                "scale must be finite and positive".to_string(),
            ));
        }
        Ok(StandardScaler {
            mean: Some(Array1::from_vec(params.mean)),
            scale: Some(Array1::from_vec(params.scale)),
        })
    }

    pub fn params(&self) -> Result<ScalerParams, ScalerError> {
        let (mean, scale) = self.fitted()?;
        Ok(ScalerParams { mean: mean.to_vec(), scale: scale.to_vec() })
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), ScalerError> {
        if x.is_empty() {
            return Err(ScalerError::EmptyInput);
        }
        let mean = x.mean_axis(Axis(0)).ok_or(ScalerError::EmptyInput)?;
        let std = x.std_axis(Axis(0), 0.0);
        self.mean = Some(mean);
        self.scale = Some(std.mapv(|s| if s == 0.0 { 1.0 } else { s }));
        Ok(())
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let (mean, scale) = self.fitted()?;
        self.check_width(x, mean.len())?;
        Ok((x - mean) / scale)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let (mean, scale) = self.fitted()?;
        self.check_width(x, mean.len())?;
        Ok(x * scale + mean)
    }

    fn fitted(&self) -> Result<(&Array1<f64>, &Array1<f64>), ScalerError> {
        match (self.mean.as_ref(), self.scale.as_ref()) {
            (Some(mean), Some(scale)) => Ok((mean, scale)),
            _ => Err(ScalerError::NotFitted),
        }
    }

    fn check_width(&self, x: &Array2<f64>, expected: usize) -> Result<(), ScalerError> {
        if x.is_empty() {
            return Err(ScalerError::EmptyInput);
        }
        if x.ncols() != expected {
            return Err(ScalerError::DimensionMismatch { expected, actual: x.ncols() });
        }
        Ok(())
    }
}
