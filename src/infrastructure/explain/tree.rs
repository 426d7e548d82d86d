//! Exact path-dependent TreeSHAP (Lundberg et al., "Consistent Individualized
//! Feature Attribution for Tree Ensembles", algorithm 2)
//!
//! For every leaf reachable from the root the algorithm keeps the list of
//! unique features split on along the way, with the fraction of "zero"
//! (feature absent, follow cover) and "one" (feature present, follow the
//! row) paths flowing through each, and the permutation weights of every
//! subset size. Attributions are polynomial in tree depth per leaf.

use std::sync::Arc;

use crate::domain::{Additivity, Classifier, DomainError, Explainer};
use crate::infrastructure::model::{GradientBoostedTrees, Tree, TreeNode};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// `None` for the root placeholder
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    weight: f64,
}

/// Grow the path by one feature and update the permutation weights
fn extend(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();

    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });

    for i in (0..depth).rev() {
        path[i + 1].weight += one_fraction * path[i].weight * (i + 1) as f64 / (depth + 1) as f64;
        path[i].weight = zero_fraction * path[i].weight * (depth - i) as f64 / (depth + 1) as f64;
    }
}

/// Undo `extend` for the element at `index`
fn unwind(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let mut next_one_portion = path[depth].weight;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let current = path[i].weight;
            path[i].weight = next_one_portion * (depth + 1) as f64 / ((i + 1) as f64 * one_fraction);
            next_one_portion =
                current - path[i].weight * zero_fraction * (depth - i) as f64 / (depth + 1) as f64;
        } else {
            path[i].weight = path[i].weight * (depth + 1) as f64 / (zero_fraction * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }

    path.pop();
}

/// Total permutation weight if the element at `index` were unwound
fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let mut next_one_portion = path[depth].weight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let portion = next_one_portion * (depth + 1) as f64 / ((i + 1) as f64 * one_fraction);
            total += portion;
            next_one_portion =
                path[i].weight - portion * zero_fraction * (depth - i) as f64 / (depth + 1) as f64;
        } else {
            total += path[i].weight / zero_fraction / ((depth - i) as f64 / (depth + 1) as f64);
        }
    }

    total
}

struct Incoming {
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
}

fn recurse(
    tree: &Tree,
    row: &[f64],
    phi: &mut [f64],
    node: usize,
    mut path: Vec<PathElement>,
    incoming: Incoming,
) {
    extend(&mut path, incoming.zero_fraction, incoming.one_fraction, incoming.feature);

    let (feature, left, right) = match &tree.nodes[node] {
        TreeNode::Leaf { value, .. } => {
            for i in 1..path.len() {
                let element = path[i];
                let weight = unwound_sum(&path, i);

                if let Some(feature) = element.feature {
                    phi[feature] += weight * (element.one_fraction - element.zero_fraction) * value;
                }
            }
            return;
        }
        TreeNode::Split {
            feature,
            left,
            right,
            ..
        } => (*feature, *left, *right),
    };

    let hot = tree.next(node, row).unwrap_or(left);
    let cold = if hot == left { right } else { left };
    let cover = tree.nodes[node].cover();

    let mut incoming_zero = 1.0;
    let mut incoming_one = 1.0;

    // A feature already on the path is merged rather than counted twice
    if let Some(existing) = (1..path.len()).find(|&i| path[i].feature == Some(feature)) {
        incoming_zero = path[existing].zero_fraction;
        incoming_one = path[existing].one_fraction;
        unwind(&mut path, existing);
    }

    recurse(
        tree,
        row,
        phi,
        hot,
        path.clone(),
        Incoming {
            zero_fraction: tree.nodes[hot].cover() / cover * incoming_zero,
            one_fraction: incoming_one,
            feature: Some(feature),
        },
    );
    recurse(
        tree,
        row,
        phi,
        cold,
        path,
        Incoming {
            zero_fraction: tree.nodes[cold].cover() / cover * incoming_zero,
            one_fraction: 0.0,
            feature: Some(feature),
        },
    );
}

/// Attributions of one tree for one row, added into `phi`
pub fn tree_shap(tree: &Tree, row: &[f64], phi: &mut [f64]) {
    recurse(
        tree,
        row,
        phi,
        0,
        Vec::new(),
        Incoming {
            zero_fraction: 1.0,
            one_fraction: 1.0,
            feature: None,
        },
    );
}

/// SHAP explainer for a gradient-boosted ensemble
#[derive(Debug)]
pub struct TreeExplainer {
    model: Arc<GradientBoostedTrees>,
    expected_value: f64,
}

impl TreeExplainer {
    pub fn new(model: Arc<GradientBoostedTrees>) -> Self {
        let expected_value = model
            .trees
            .iter()
            .fold(model.base_score, |acc, tree| acc + tree.expected_value());

        Self {
            model,
            expected_value,
        }
    }

    fn explain_row(&self, row: &[f64]) -> Result<Vec<f64>, DomainError> {
        if row.len() != self.model.n_features {
            return Err(DomainError::internal(format!(
                "expected {} features, got {}",
                self.model.n_features,
                row.len()
            )));
        }

        let mut phi = vec![0.0; row.len()];

        for tree in &self.model.trees {
            tree_shap(tree, row, &mut phi);
        }

        Ok(phi)
    }
}

impl Explainer for TreeExplainer {
    fn expected_value(&self) -> f64 {
        self.expected_value
    }

    fn shap_values(
        &self,
        rows: &[Vec<f64>],
        additivity: Additivity,
    ) -> Result<Vec<Vec<f64>>, DomainError> {
        rows.iter()
            .map(|row| {
                let phi = self.explain_row(row)?;
                additivity.check(&phi, self.expected_value, self.model.raw_output(row)?)?;
                Ok(phi)
            })
            .collect()
    }
}
