//! Multi-class classification losses.

use super::{Loss, MultiClassLoss};
use crate::math::{clamp_proba, indicator};

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Categorical cross-entropy over a map of per-class probabilities.
///
/// Probabilities are clamped to `[1e-15, 1 - 1e-15]` in both `eval` and `gradient`,
/// so a prediction of exactly `0` or `1` still yields finite values. Classes missing
/// from `class_weight` have a weight of `1`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize + Eq + Hash",
    deserialize = "L: Deserialize<'de> + Eq + Hash"
))]
pub struct CrossEntropy<L> {
    #[serde(default = "HashMap::new")]
    class_weight: HashMap<L, f64>,
}

impl<L> CrossEntropy<L>
where
    L: Eq + Hash,
{
    pub fn new(class_weight: HashMap<L, f64>) -> Self {
        Self { class_weight }
    }

    pub fn class_weight(&self) -> &HashMap<L, f64> {
        &self.class_weight
    }

    fn weight(&self, label: &L) -> f64 {
        self.class_weight.get(label).copied().unwrap_or(1.)
    }
}

impl<L> Default for CrossEntropy<L>
where
    L: Eq + Hash,
{
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl<L> PartialEq for CrossEntropy<L>
where
    L: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.class_weight == other.class_weight
    }
}

impl<L> Display for CrossEntropy<L>
where
    L: Debug + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // HashMap iteration order is random, sort for reproducible descriptions
        let mut weights: Vec<(&L, &f64)> = self.class_weight.iter().collect();
        weights.sort_by(|a, b| a.0.cmp(b.0));

        f.write_str("CrossEntropy(class_weight={")?;
        for (i, (label, w)) in weights.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {}", label, w)?;
        }
        f.write_str("})")
    }
}

impl<L> Loss for CrossEntropy<L>
where
    L: Debug + Ord,
{
    fn name(&self) -> &'static str {
        "cross_entropy"
    }
}

impl<L> MultiClassLoss<L> for CrossEntropy<L>
where
    L: Eq + Hash + Clone + Debug + Ord,
{
    fn eval(&self, y_true: &L, y_pred: &HashMap<L, f64>) -> f64 {
        let total: f64 = y_pred
            .iter()
            .filter(|(label, _)| *label == y_true)
            .map(|(label, proba)| self.weight(label) * clamp_proba(*proba).ln())
            .sum();
        -total
    }

    fn gradient(&self, y_true: &L, y_pred: &HashMap<L, f64>) -> HashMap<L, f64> {
        let mut grads: HashMap<L, f64> = y_pred
            .iter()
            .map(|(label, proba)| {
                let grad = clamp_proba(*proba) - indicator(label == y_true);
                (label.clone(), self.weight(label) * grad)
            })
            .collect();

        if !grads.contains_key(y_true) {
            let grad = clamp_proba(0.) - 1.;
            grads.insert(y_true.clone(), self.weight(y_true) * grad);
        }
        grads
    }
}
