//! Per-example loss functions.
//!
//! Every loss implements exactly one of the three capabilities:
//! - [`BinaryLoss`]: boolean label, raw score prediction.
//! - [`MultiClassLoss`]: arbitrary hashable label, map of per-class probabilities.
//! - [`RegressionLoss`]: real valued label and prediction.
//!
//! `eval` returns the loss value and `gradient` its derivative with respect to the
//! prediction. Both are pure, an instance can be shared freely between threads.

pub mod classification;
pub mod multiclass;
pub mod regression;

pub use classification::{BinaryFocalLoss, Hinge, Log};
pub use multiclass::CrossEntropy;
pub use regression::{Absolute, Cauchy, EpsilonInsensitiveHinge, Poisson, Quantile, Squared};

use crate::math::{sigmoid, softmax};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::hash::Hash;

/// Root capability shared by all losses. The `Display` output describes the
/// loss together with its parameters, e.g. `Quantile(alpha=0.5)`.
#[enum_dispatch]
pub trait Loss: Display {
    /// Short identifier of the loss kind.
    fn name(&self) -> &'static str;
}

#[enum_dispatch]
pub trait BinaryLoss: Loss {
    /// Loss of predicting the raw score `y_pred` when the truth is `y_true`.
    fn eval(&self, y_true: bool, y_pred: f64) -> f64;

    /// Derivative of [`eval`](BinaryLoss::eval) with respect to `y_pred`.
    fn gradient(&self, y_true: bool, y_pred: f64) -> f64;

    /// Converts a raw score into the probability of the positive class.
    fn mean_func(&self, y_pred: f64) -> f64 {
        sigmoid(y_pred)
    }
}

#[enum_dispatch]
pub trait RegressionLoss: Loss {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64;

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64;

    /// Converts a raw prediction into the mean of the target.
    fn mean_func(&self, y_pred: f64) -> f64 {
        y_pred
    }
}

pub trait MultiClassLoss<L>: Loss
where
    L: Eq + Hash + Clone,
{
    fn eval(&self, y_true: &L, y_pred: &HashMap<L, f64>) -> f64;

    /// The returned map holds an entry for every label of `y_pred` and for `y_true`,
    /// even when the latter is missing from the prediction.
    fn gradient(&self, y_true: &L, y_pred: &HashMap<L, f64>) -> HashMap<L, f64>;

    /// Turns per-class scores into a probability distribution.
    fn mean_func(&self, y_pred: &HashMap<L, f64>) -> HashMap<L, f64> {
        softmax(y_pred)
    }
}

/// Any of the binary classification losses.
#[enum_dispatch(Loss)]
#[enum_dispatch(BinaryLoss)]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum BinaryLossFn {
    Hinge(Hinge),
    Log(Log),
    BinaryFocalLoss(BinaryFocalLoss),
}

impl Default for BinaryLossFn {
    fn default() -> Self {
        Self::Log(Log::default())
    }
}

impl Display for BinaryLossFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hinge(l) => Display::fmt(l, f),
            Self::Log(l) => Display::fmt(l, f),
            Self::BinaryFocalLoss(l) => Display::fmt(l, f),
        }
    }
}

/// Any of the regression losses.
#[enum_dispatch(Loss)]
#[enum_dispatch(RegressionLoss)]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum RegressionLossFn {
    Absolute(Absolute),
    Cauchy(Cauchy),
    EpsilonInsensitiveHinge(EpsilonInsensitiveHinge),
    Quantile(Quantile),
    Squared(Squared),
    Poisson(Poisson),
}

impl Default for RegressionLossFn {
    fn default() -> Self {
        Self::Squared(Squared)
    }
}

impl Display for RegressionLossFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(l) => Display::fmt(l, f),
            Self::Cauchy(l) => Display::fmt(l, f),
            Self::EpsilonInsensitiveHinge(l) => Display::fmt(l, f),
            Self::Quantile(l) => Display::fmt(l, f),
            Self::Squared(l) => Display::fmt(l, f),
            Self::Poisson(l) => Display::fmt(l, f),
        }
    }
}
