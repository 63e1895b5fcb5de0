use serde::{Deserialize, Serialize};

use super::{check_width, ModelError};

/// `y = intercept + Σ coefficients[i] · x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Linear {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self { intercept, coefficients }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.coefficients.len() != n_features {
            return Err(ModelError::FeatureMismatch {
                expected: n_features,
                found: self.coefficients.len(),
            });
        }
        Ok(())
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_width(self.coefficients.len(), x)?;
        let dot: f64 = self.coefficients.iter().zip(x).map(|(w, v)| w * v).sum();
        Ok(self.intercept + dot)
    }
}
