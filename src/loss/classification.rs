//! Binary classification losses.
//!
//! The prediction is a raw score (a logit), not a probability. Labels are remapped
//! to `{-1, +1}` before the margin `y * p` is formed.

use super::{BinaryLoss, Loss};
use crate::math::{sigmoid, softplus, to_pm1};

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// Margin beyond which the logistic loss switches to its asymptotic forms.
const LOG_CUTOFF: f64 = 18.;

/// Hinge loss, `max(0, 1 - y * p)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hinge;

impl Display for Hinge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hinge")
    }
}

impl Loss for Hinge {
    fn name(&self) -> &'static str {
        "hinge"
    }
}

impl BinaryLoss for Hinge {
    fn eval(&self, y_true: bool, y_pred: f64) -> f64 {
        let y = to_pm1(y_true);
        f64::max(1. - y * y_pred, 0.)
    }

    /// Inside the margin this returns `-y_pred`, outside it `0`.
    fn gradient(&self, y_true: bool, y_pred: f64) -> f64 {
        let y = to_pm1(y_true);
        if y * y_pred < 1. {
            -y_pred
        } else {
            0.
        }
    }
}

/// Logistic loss with separate weights for positive and negative samples.
///
/// For margins `z = y * p` with `|z| > 18` the asymptotic forms are used so that
/// `exp` never overflows and the result stays finite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Log {
    weight_pos: f64,
    weight_neg: f64,
}

impl Log {
    pub fn new(weight_pos: f64, weight_neg: f64) -> Self {
        Self {
            weight_pos,
            weight_neg,
        }
    }

    pub fn weight_pos(&self) -> f64 {
        self.weight_pos
    }

    pub fn weight_neg(&self) -> f64 {
        self.weight_neg
    }

    fn weight(&self, y_true: bool) -> f64 {
        if y_true {
            self.weight_pos
        } else {
            self.weight_neg
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new(1., 1.)
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log(weight_pos={}, weight_neg={})",
            self.weight_pos, self.weight_neg
        )
    }
}

impl Loss for Log {
    fn name(&self) -> &'static str {
        "log"
    }
}

impl BinaryLoss for Log {
    fn eval(&self, y_true: bool, y_pred: f64) -> f64 {
        let weight = self.weight(y_true);
        let z = y_pred * to_pm1(y_true);

        if z > LOG_CUTOFF {
            weight * (-z).exp()
        } else if z < -LOG_CUTOFF {
            weight * -z
        } else {
            weight * (-z).exp().ln_1p()
        }
    }

    fn gradient(&self, y_true: bool, y_pred: f64) -> f64 {
        let weight = self.weight(y_true);
        let y = to_pm1(y_true);
        let z = y_pred * y;

        if z > LOG_CUTOFF {
            weight * (-z).exp() * -y
        } else if z < -LOG_CUTOFF {
            weight * -y
        } else {
            weight * -y / (z.exp() + 1.)
        }
    }
}

/// The "star" variant of the focal loss.
///
/// `gamma` sharpens the margin and `beta` shifts it. With `gamma = 1, beta = 0`
/// this reduces to the plain logistic loss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryFocalLoss {
    gamma: f64,
    beta: f64,
}

impl BinaryFocalLoss {
    pub fn new(gamma: f64, beta: f64) -> Self {
        Self { gamma, beta }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    fn shifted_margin(&self, y: f64, y_pred: f64) -> f64 {
        self.gamma * y * y_pred + self.beta
    }
}

impl Default for BinaryFocalLoss {
    fn default() -> Self {
        Self::new(2., 1.)
    }
}

impl Display for BinaryFocalLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryFocalLoss(gamma={}, beta={})", self.gamma, self.beta)
    }
}

impl Loss for BinaryFocalLoss {
    fn name(&self) -> &'static str {
        "binary_focal_loss"
    }
}

impl BinaryLoss for BinaryFocalLoss {
    fn eval(&self, y_true: bool, y_pred: f64) -> f64 {
        let y = to_pm1(y_true);
        // -ln(sigmoid(m)) == softplus(-m)
        softplus(-self.shifted_margin(y, y_pred)) / self.gamma
    }

    fn gradient(&self, y_true: bool, y_pred: f64) -> f64 {
        let y = to_pm1(y_true);
        y * (sigmoid(self.shifted_margin(y, y_pred)) - 1.)
    }
}
