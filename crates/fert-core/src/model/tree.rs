//! Flattened binary regression tree.
//!
//! Nodes live in a single vector with the root at index 0. A split sends
//! the sample left when `x[feature] <= threshold`. Children must sit at a
//! higher index than their parent, which rules out cycles and bounds every
//! walk by the node count.

use serde::{Deserialize, Serialize};

use super::{check_width, ModelError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Leaf(f64),
    Split(Split),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub n_features: usize,
    pub nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn new(n_features: usize, nodes: Vec<Node>) -> Self {
        Self { n_features, nodes }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.n_features != n_features {
            return Err(ModelError::FeatureMismatch {
                expected: n_features,
                found: self.n_features,
            });
        }
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidTree("no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let Node::Split(s) = node else { continue };
            if s.feature >= n_features {
                return Err(ModelError::InvalidTree(format!(
                    "node {i} splits on feature {} of {n_features}",
                    s.feature
                )));
            }
            for child in [s.left, s.right] {
                if child <= i || child >= self.nodes.len() {
                    return Err(ModelError::InvalidTree(format!(
                        "node {i} has child {child} (nodes: {})",
                        self.nodes.len()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, x)?;
        let mut i = 0;
        // Bounded walk; only reachable by a tree that skipped `validate`.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(i) {
                Some(Node::Leaf(value)) => return Ok(*value),
                Some(Node::Split(s)) => {
                    let v = x.get(s.feature).copied().ok_or_else(|| {
                        ModelError::InvalidTree(format!("node {i} splits on missing feature {}", s.feature))
                    })?;
                    i = if v <= s.threshold { s.left } else { s.right };
                }
                None => break,
            }
        }
        Err(ModelError::InvalidTree(format!("walk did not reach a leaf (stopped at node {i})")))
    }
}
