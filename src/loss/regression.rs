//! Regression losses. `y_true` and `y_pred` are both real valued.

use super::{Loss, RegressionLoss};
use crate::math::indicator;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// Absolute error, `|p - y|`.
///
/// The gradient is undefined at `p == y`, where `-1` is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Absolute;

impl Display for Absolute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Absolute")
    }
}

impl Loss for Absolute {
    fn name(&self) -> &'static str {
        "absolute"
    }
}

impl RegressionLoss for Absolute {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        (y_pred - y_true).abs()
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        if y_pred > y_true {
            1.
        } else {
            -1.
        }
    }
}

/// Cauchy loss, robust to outliers. `scale` controls how strongly large residuals
/// are damped in the gradient.
///
/// The value returned by `eval` is the absolute error, not the Cauchy forward value
/// `ln(1 + (d/scale)^2)` whose derivative the gradient follows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cauchy {
    scale: f64,
}

impl Cauchy {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for Cauchy {
    fn default() -> Self {
        Self::new(80.)
    }
}

impl Display for Cauchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cauchy(scale={})", self.scale)
    }
}

impl Loss for Cauchy {
    fn name(&self) -> &'static str {
        "cauchy"
    }
}

impl RegressionLoss for Cauchy {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        (y_pred - y_true).abs()
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        let diff = y_pred - y_true;
        let r = diff / self.scale;
        diff / (r * r + 1.)
    }
}

/// Epsilon-insensitive hinge loss. Residuals smaller than `eps` cost nothing.
///
/// A label of exactly `0` is read as `-1`, following the `{-1, +1}` convention.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonInsensitiveHinge {
    eps: f64,
}

impl EpsilonInsensitiveHinge {
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl Default for EpsilonInsensitiveHinge {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Display for EpsilonInsensitiveHinge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpsilonInsensitiveHinge(eps={})", self.eps)
    }
}

#[inline]
fn remap_zero(y_true: f64) -> f64 {
    if y_true == 0. {
        -1.
    } else {
        y_true
    }
}

impl Loss for EpsilonInsensitiveHinge {
    fn name(&self) -> &'static str {
        "epsilon_insensitive_hinge"
    }
}

impl RegressionLoss for EpsilonInsensitiveHinge {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        let y_true = remap_zero(y_true);
        f64::max((y_pred - y_true).abs() - self.eps, 0.)
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        let y_true = remap_zero(y_true);
        if y_pred > y_true + self.eps {
            1.
        } else if y_pred + self.eps < y_true {
            -1.
        } else {
            0.
        }
    }
}

/// Quantile (pinball) loss. `alpha = 0.5` is median regression.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantile {
    alpha: f64,
}

impl Quantile {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for Quantile {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantile(alpha={})", self.alpha)
    }
}

impl Loss for Quantile {
    fn name(&self) -> &'static str {
        "quantile"
    }
}

impl RegressionLoss for Quantile {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        let diff = y_pred - y_true;
        (self.alpha - indicator(diff < 0.)) * diff
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        indicator(y_true < y_pred) - self.alpha
    }
}

/// Squared error, `(p - y)^2`. There is no `1/2` factor, so the gradient is `2(p - y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Squared;

impl Display for Squared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Squared")
    }
}

impl Loss for Squared {
    fn name(&self) -> &'static str {
        "squared"
    }
}

impl RegressionLoss for Squared {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        let diff = y_pred - y_true;
        diff * diff
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        2. * (y_pred - y_true)
    }
}

/// Poisson loss for count data. `y_pred` is a log-rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Poisson;

impl Display for Poisson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Poisson")
    }
}

impl Loss for Poisson {
    fn name(&self) -> &'static str {
        "poisson"
    }
}

impl RegressionLoss for Poisson {
    fn eval(&self, y_true: f64, y_pred: f64) -> f64 {
        y_pred.exp() - y_true * y_pred
    }

    fn gradient(&self, y_true: f64, y_pred: f64) -> f64 {
        y_pred.exp() - y_true
    }

    fn mean_func(&self, y_pred: f64) -> f64 {
        y_pred.exp()
    }
}
