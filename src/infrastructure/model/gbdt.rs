//! Gradient-boosted decision tree ensemble with a logistic link
//!
//! Trees are stored as flat node arrays. A row goes left when its value is
//! `<= threshold`; a missing value (NaN) follows the node's default branch.
//! Children always sit after their parent in the array, which `validate`
//! checks once at load time so evaluation can never loop.

use serde::{Deserialize, Serialize};

use crate::domain::{sigmoid, Classifier, DomainError};

/// A decision tree node (split or leaf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Training weight (sample count or hessian sum) reaching the node
        cover: f64,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

fn default_left() -> bool {
    true
}

impl TreeNode {
    pub fn cover(&self) -> f64 {
        match self {
            Self::Split { cover, .. } | Self::Leaf { cover, .. } => *cover,
        }
    }
}

/// A single decision tree, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn validate(&self, feature_count: usize) -> Result<(), DomainError> {
        if self.nodes.is_empty() {
            return Err(DomainError::configuration("tree has no nodes"));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    cover,
                    ..
                } => {
                    if *feature >= feature_count {
                        return Err(DomainError::configuration(format!(
                            "node {} splits on feature {} but the model has {} features",
                            index, feature, feature_count
                        )));
                    }

                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(DomainError::configuration(format!(
                                "node {} points to invalid child {}",
                                index, child
                            )));
                        }
                    }

                    if threshold.is_nan() || !(*cover > 0.0) {
                        return Err(DomainError::configuration(format!(
                            "node {} needs a threshold and a positive cover",
                            index
                        )));
                    }
                }
                TreeNode::Leaf { value, cover } => {
                    if !value.is_finite() || !(*cover > 0.0) {
                        return Err(DomainError::configuration(format!(
                            "leaf {} needs a finite value and a positive cover",
                            index
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Index of the child a row takes at a split node
    pub fn next(&self, index: usize, row: &[f64]) -> Option<usize> {
        match &self.nodes[index] {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                default_left,
                ..
            } => {
                let value = row[*feature];
                let go_left = if value.is_nan() {
                    *default_left
                } else {
                    value <= *threshold
                };
                Some(if go_left { *left } else { *right })
            }
            TreeNode::Leaf { .. } => None,
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;

        while let Some(child) = self.next(index, row) {
            index = child;
        }

        match self.nodes[index] {
            TreeNode::Leaf { value, .. } => value,
            TreeNode::Split { .. } => unreachable!("walk stops at leaves"),
        }
    }

    /// Cover-weighted mean leaf value: the tree's output with no information
    pub fn expected_value(&self) -> f64 {
        self.expected_value_at(0)
    }

    fn expected_value_at(&self, index: usize) -> f64 {
        match &self.nodes[index] {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split { left, right, .. } => {
                let left_cover = self.nodes[*left].cover();
                let right_cover = self.nodes[*right].cover();
                let total = left_cover + right_cover;

                if total == 0.0 {
                    return 0.5 * (self.expected_value_at(*left) + self.expected_value_at(*right));
                }

                (left_cover * self.expected_value_at(*left)
                    + right_cover * self.expected_value_at(*right))
                    / total
            }
        }
    }
}

/// Complete ensemble: margin = base_score + sum of tree outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub base_score: f64,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl GradientBoostedTrees {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.trees.is_empty() {
            return Err(DomainError::configuration("ensemble has no trees"));
        }

        if !self.base_score.is_finite() {
            return Err(DomainError::configuration("base_score must be finite"));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| {
                DomainError::configuration(format!("tree {}: {}", index, e))
            })?;
        }

        Ok(())
    }
}

impl Classifier for GradientBoostedTrees {
    fn feature_count(&self) -> usize {
        self.n_features
    }

    fn raw_output(&self, row: &[f64]) -> Result<f64, DomainError> {
        if row.len() != self.n_features {
            return Err(DomainError::internal(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        Ok(self
            .trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict(row)))
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, DomainError> {
        Ok(sigmoid(self.raw_output(row)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two features; first tree splits on feature 0 then feature 1.
    pub(crate) fn sample_ensemble() -> GradientBoostedTrees {
        let first = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 1,
                    right: 2,
                    cover: 10.0,
                    default_left: true,
                },
                TreeNode::Leaf {
                    value: -1.0,
                    cover: 4.0,
                },
                TreeNode::Split {
                    feature: 1,
                    threshold: 1.0,
                    left: 3,
                    right: 4,
                    cover: 6.0,
                    default_left: false,
                },
                TreeNode::Leaf {
                    value: 0.5,
                    cover: 2.0,
                },
                TreeNode::Leaf {
                    value: 2.0,
                    cover: 4.0,
                },
            ],
        };
        let second = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 1,
                    threshold: -0.5,
                    left: 1,
                    right: 2,
                    cover: 10.0,
                    default_left: true,
                },
                TreeNode::Leaf {
                    value: 0.25,
                    cover: 5.0,
                },
                TreeNode::Leaf {
                    value: -0.25,
                    cover: 5.0,
                },
            ],
        };

        GradientBoostedTrees {
            trees: vec![first, second],
            base_score: -0.5,
            n_features: 2,
            feature_names: None,
        }
    }

    #[test]
    fn test_tree_routing() {
        let model = sample_ensemble();
        let tree = &model.trees[0];

        assert_eq!(tree.predict(&[-1.0, 0.0]), -1.0);
        assert_eq!(tree.predict(&[0.0, 5.0]), -1.0);
        assert_eq!(tree.predict(&[1.0, 1.0]), 0.5);
        assert_eq!(tree.predict(&[1.0, 3.0]), 2.0);
    }

    #[test]
    fn test_missing_values_follow_default_branch() {
        let model = sample_ensemble();
        let tree = &model.trees[0];

        assert_eq!(tree.predict(&[f64::NAN, 3.0]), -1.0);
        assert_eq!(tree.predict(&[1.0, f64::NAN]), 2.0);
    }

    #[test]
    fn test_raw_output_sums_trees() {
        let model = sample_ensemble();

        assert_eq!(model.raw_output(&[1.0, 3.0]).unwrap(), -0.5 + 2.0 - 0.25);
        assert_eq!(model.predict_proba(&[-1.0, 0.0]).unwrap(), sigmoid(-1.5 - 0.25));
    }

    #[test]
    fn test_expected_value_is_cover_weighted() {
        let model = sample_ensemble();

        // (4 * -1 + 6 * ((2 * 0.5 + 4 * 2) / 6)) / 10 = 0.5
        assert_eq!(model.trees[0].expected_value(), 0.5);
        assert_eq!(model.trees[1].expected_value(), 0.0);
    }

    #[test]
    fn test_validate_rejects_backward_links() {
        let mut model = sample_ensemble();
        assert!(model.validate().is_ok());

        model.trees[1].nodes[0] = TreeNode::Split {
            feature: 1,
            threshold: 0.0,
            left: 0,
            right: 2,
            cover: 10.0,
            default_left: true,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cover_leaf() {
        let mut model = sample_ensemble();
        model.trees[1].nodes[2] = TreeNode::Leaf {
            value: -0.25,
            cover: 0.0,
        };

        assert!(matches!(
            model.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let mut model = sample_ensemble();
        model.n_features = 1;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_node_json_forms() {
        let split: TreeNode = serde_json::from_str(
            r#"{"feature": 3, "threshold": 0.5, "left": 1, "right": 2, "cover": 8}"#,
        )
        .unwrap();
        let leaf: TreeNode = serde_json::from_str(r#"{"value": -0.1, "cover": 3}"#).unwrap();

        assert!(matches!(split, TreeNode::Split { default_left: true, .. }));
        assert!(matches!(leaf, TreeNode::Leaf { .. }));
    }
}
