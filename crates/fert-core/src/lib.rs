//! Fertilizer recommendation core.
//!
//! Three per-nutrient regression models predict the ideal N, P and K levels
//! for a crop under given conditions; the recommender turns the shortfall
//! against measured soil levels into kilograms of MOP, DAP and Urea.

pub mod config;
pub mod crop;
pub mod error;
pub mod model;
pub mod recommend;
pub mod sample;

pub use config::ModelPaths;
pub use crop::Crop;
pub use error::{InvalidInput, RecommendError};
pub use model::{Model, ModelError, Predictor};
pub use recommend::{FertilizerPlan, Recommendation, Recommender};
pub use sample::{check_range, EnvironmentSample, Npk, Nutrient, NutrientReading, Request};
