use thiserror::Error;

use crate::model::ModelError;
use crate::sample::Nutrient;

/// A request that cannot be turned into a model feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("unknown crop '{0}'")]
    UnknownCrop(String),

    #[error("crop index {0} is outside the crop table (0-20)")]
    CropIndexOutOfRange(usize),

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: &'static str, value: f64, min: f64 },

    #[error("{field} must be at most {max}, got {value}")]
    AboveMaximum { field: &'static str, value: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("{nutrient} predictor failed: {source}")]
    Predictor {
        nutrient: Nutrient,
        #[source]
        source: ModelError,
    },
}

pub type RecommendResult<T> = Result<T, RecommendError>;
