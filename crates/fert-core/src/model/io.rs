//! Loading models from JSON.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::info;

use super::{Model, ModelError};
use crate::sample::FEATURE_COUNT;

impl Model {
    /// Parse and validate a model expecting the standard feature vector.
    pub fn from_json_str(json: &str) -> Result<Model, ModelError> {
        let model: Model = serde_json::from_str(json).map_err(ModelError::Json)?;
        model.validate(FEATURE_COUNT)?;
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Model, ModelError> {
        let model: Model = serde_json::from_reader(reader).map_err(ModelError::Json)?;
        model.validate(FEATURE_COUNT)?;
        Ok(model)
    }
}

/// Read, parse and validate one model file.
pub fn load(path: &Path) -> Result<Model, ModelError> {
    let text = fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let model: Model = serde_json::from_str(&text).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    model.validate(FEATURE_COUNT).map_err(|source| ModelError::Invalid {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    info!(
        path = %path.display(),
        kind = model.kind(),
        n_features = model.n_features(),
        "loaded model"
    );
    Ok(model)
}
