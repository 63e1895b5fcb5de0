//! Where the three nutrient models are loaded from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{self, Model, ModelError};
use crate::recommend::Recommender;
use crate::sample::{Npk, Nutrient};

pub const DEFAULT_MODELS_DIR: &str = "models";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Model file per nutrient. Omitted entries in a config file keep their
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub nitrogen: PathBuf,
    pub phosphorus: PathBuf,
    pub potassium: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_MODELS_DIR))
    }
}

impl ModelPaths {
    /// Default file name for a nutrient, e.g. `stacking_model_N.json`.
    pub fn file_name(nutrient: Nutrient) -> String {
        format!("stacking_model_{}.json", nutrient.symbol())
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nitrogen: dir.join(Self::file_name(Nutrient::Nitrogen)),
            phosphorus: dir.join(Self::file_name(Nutrient::Phosphorus)),
            potassium: dir.join(Self::file_name(Nutrient::Potassium)),
        }
    }

    /// Read a JSON config. Relative paths are taken relative to the config
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let paths: ModelPaths = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(paths.relative_to(base))
    }

    pub fn relative_to(self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            nitrogen: rebase(self.nitrogen),
            phosphorus: rebase(self.phosphorus),
            potassium: rebase(self.potassium),
        }
    }

    pub fn as_npk(&self) -> Npk<&Path> {
        Npk::new(self.nitrogen.as_path(), self.phosphorus.as_path(), self.potassium.as_path())
    }

    /// Load and validate all three models.
    pub fn load_recommender(&self) -> Result<Recommender<Model>, ModelError> {
        let models = self.as_npk().try_map(|_, path| model::load(path))?;
        Ok(Recommender::new(models.nitrogen, models.phosphorus, models.potassium))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_models_dir() {
        let paths = ModelPaths::default();
        assert_eq!(paths.nitrogen, Path::new("models/stacking_model_N.json"));
        assert_eq!(paths.phosphorus, Path::new("models/stacking_model_P.json"));
        assert_eq!(paths.potassium, Path::new("models/stacking_model_K.json"));
    }

    #[test]
    fn omitted_entries_keep_defaults() {
        let paths: ModelPaths = serde_json::from_str(r#"{"potassium":"k_v2.json"}"#).unwrap();
        assert_eq!(paths.potassium, Path::new("k_v2.json"));
        assert_eq!(paths.nitrogen, ModelPaths::default().nitrogen);
    }

    #[test]
    fn relative_paths_are_rebased() {
        let paths = ModelPaths {
            nitrogen: PathBuf::from("n.json"),
            phosphorus: PathBuf::from("/abs/p.json"),
            potassium: PathBuf::from("sub/k.json"),
        }
        .relative_to(Path::new("conf"));
        assert_eq!(paths.nitrogen, Path::new("conf/n.json"));
        assert_eq!(paths.phosphorus, Path::new("/abs/p.json"));
        assert_eq!(paths.potassium, Path::new("conf/sub/k.json"));
    }

    #[test]
    fn missing_config_is_read_error() {
        let err = ModelPaths::from_file(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "got {err:?}");
    }

    /// The sample models shipped with the repository load and predict.
    #[test]
    fn shipped_models_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models");
        let recommender = ModelPaths::in_dir(&dir).load_recommender().unwrap();
        let env = crate::sample::EnvironmentSample::new(
            25.0,
            80.0,
            6.5,
            200.0,
            crate::crop::Crop::Rice,
        );
        let ideal = recommender.predict_ideal(&env).unwrap();
        for n in Nutrient::ALL {
            assert!(ideal.get(n).is_finite(), "{n}: {}", ideal.get(n));
        }
    }
}
