//! Pretrained per-nutrient regression models.
//!
//! Models are supplied already trained as JSON documents tagged by `kind`:
//!   - `linear`   — intercept + dot product
//!   - `tree`     — flattened binary regression tree
//!   - `forest`   — mean of member models
//!   - `stacking` — a final estimator over member predictions
//!
//! Everything here is read-only after load.

pub mod ensemble;
pub mod io;
pub mod linear;
pub mod tree;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sample::Features;

pub use ensemble::{Forest, Stacking};
pub use io::load;
pub use linear::Linear;
pub use tree::{Node, RegressionTree, Split};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("invalid tree: {0}")]
    InvalidTree(String),

    #[error("{0} has no member models")]
    EmptyEnsemble(&'static str),

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    #[error("invalid model JSON")]
    Json(#[source] serde_json::Error),

    #[error("cannot read model file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse model file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<ModelError>,
    },
}

// ── Predictor seam ────────────────────────────────────────────────────────────

/// Maps a feature vector to the ideal concentration of one nutrient.
///
/// Implementations must be pure: the same features always give the same
/// prediction, and a shared reference may be used from several threads.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &Features) -> Result<f64, ModelError>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, features: &Features) -> Result<f64, ModelError> {
        (**self).predict(features)
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    Linear(Linear),
    Tree(RegressionTree),
    Forest(Forest),
    Stacking(Stacking),
}

impl Model {
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Linear(_) => "linear",
            Model::Tree(_) => "tree",
            Model::Forest(_) => "forest",
            Model::Stacking(_) => "stacking",
        }
    }

    /// Input width the model expects.
    pub fn n_features(&self) -> usize {
        match self {
            Model::Linear(m) => m.coefficients.len(),
            Model::Tree(m) => m.n_features,
            Model::Forest(m) => m.trees.first().map_or(0, Model::n_features),
            Model::Stacking(m) => m.n_features(),
        }
    }

    /// Structural check run once at load time, so that `predict` only has
    /// to guard the input width.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        match self {
            Model::Linear(m) => m.validate(n_features),
            Model::Tree(m) => m.validate(n_features),
            Model::Forest(m) => m.validate(n_features),
            Model::Stacking(m) => m.validate(n_features),
        }
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        let y = match self {
            Model::Linear(m) => m.predict(x)?,
            Model::Tree(m) => m.predict(x)?,
            Model::Forest(m) => m.predict(x)?,
            Model::Stacking(m) => m.predict(x)?,
        };
        if y.is_finite() {
            Ok(y)
        } else {
            Err(ModelError::NonFinite(y))
        }
    }
}

impl Predictor for Model {
    fn predict(&self, features: &Features) -> Result<f64, ModelError> {
        Model::predict(self, features)
    }
}

/// Shared input-width guard.
pub(crate) fn check_width(expected: usize, x: &[f64]) -> Result<(), ModelError> {
    if x.len() == expected {
        Ok(())
    } else {
        Err(ModelError::FeatureMismatch { expected, found: x.len() })
    }
}
