//! Ensembles built from other models.

use serde::{Deserialize, Serialize};

use super::{check_width, Model, ModelError};

/// Averaging ensemble (random forest style).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<Model>,
}

impl Forest {
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble("forest"));
        }
        self.trees.iter().try_for_each(|m| m.validate(n_features))
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble("forest"));
        }
        let mut sum = 0.0;
        for m in &self.trees {
            sum += m.predict(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

/// Stacked generalisation: `final_estimator` is fed the member predictions,
/// followed by the raw features when `passthrough` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stacking {
    pub estimators: Vec<Model>,
    pub final_estimator: Box<Model>,
    #[serde(default)]
    pub passthrough: bool,
}

impl Stacking {
    pub fn n_features(&self) -> usize {
        self.estimators.first().map_or(0, Model::n_features)
    }

    fn meta_width(&self, n_features: usize) -> usize {
        self.estimators.len() + if self.passthrough { n_features } else { 0 }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.estimators.is_empty() {
            return Err(ModelError::EmptyEnsemble("stacking"));
        }
        self.estimators.iter().try_for_each(|m| m.validate(n_features))?;
        self.final_estimator.validate(self.meta_width(n_features))
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        if self.estimators.is_empty() {
            return Err(ModelError::EmptyEnsemble("stacking"));
        }
        check_width(self.n_features(), x)?;
        let mut meta = Vec::with_capacity(self.meta_width(x.len()));
        for m in &self.estimators {
            meta.push(m.predict(x)?);
        }
        if self.passthrough {
            meta.extend_from_slice(x);
        }
        self.final_estimator.predict(&meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Linear, Node, RegressionTree, Split};
    use approx::assert_relative_eq;

    fn stump(threshold: f64, low: f64, high: f64) -> Model {
        Model::Tree(RegressionTree::new(
            2,
            vec![
                Node::Split(Split { feature: 0, threshold, left: 1, right: 2 }),
                Node::Leaf(low),
                Node::Leaf(high),
            ],
        ))
    }

    #[test]
    fn forest_averages_members() {
        let f = Forest { trees: vec![stump(10.0, 0.0, 30.0), stump(20.0, 6.0, 12.0)] };
        assert!(f.validate(2).is_ok());
        // x0 = 15: first stump → 30, second → 6.
        assert_relative_eq!(f.predict(&[15.0, 0.0]).unwrap(), 18.0);
    }

    #[test]
    fn empty_forest_is_rejected() {
        let f = Forest { trees: vec![] };
        assert!(matches!(f.validate(2), Err(ModelError::EmptyEnsemble("forest"))));
        assert!(f.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn stacking_combines_member_predictions() {
        let s = Stacking {
            estimators: vec![
                stump(10.0, 4.0, 8.0),
                Model::Linear(Linear::new(1.0, vec![0.0, 2.0])),
            ],
            final_estimator: Box::new(Model::Linear(Linear::new(0.5, vec![0.5, 0.25]))),
            passthrough: false,
        };
        assert!(s.validate(2).is_ok());
        // members: stump(12) = 8, linear = 1 + 2·3 = 7; final = 0.5 + 4 + 1.75
        assert_relative_eq!(s.predict(&[12.0, 3.0]).unwrap(), 6.25);
    }

    #[test]
    fn stacking_passthrough_appends_raw_features() {
        let s = Stacking {
            estimators: vec![Model::Linear(Linear::new(0.0, vec![1.0, 1.0]))],
            final_estimator: Box::new(Model::Linear(Linear::new(0.0, vec![1.0, 10.0, 100.0]))),
            passthrough: true,
        };
        assert!(s.validate(2).is_ok());
        // member = 3; final = 3 + 10·1 + 100·2
        assert_relative_eq!(s.predict(&[1.0, 2.0]).unwrap(), 213.0);
    }

    #[test]
    fn stacking_final_width_is_checked() {
        let s = Stacking {
            estimators: vec![stump(1.0, 0.0, 1.0), stump(2.0, 0.0, 1.0)],
            final_estimator: Box::new(Model::Linear(Linear::new(0.0, vec![1.0]))),
            passthrough: false,
        };
        assert!(matches!(
            s.validate(2),
            Err(ModelError::FeatureMismatch { expected: 2, found: 1 })
        ));
    }
}
