//! Serializable description of a loss, for picking one from a configuration file.
//!
//! ```json
//! { "loss": "quantile", "alpha": 0.9 }
//! ```
//!
//! Parameters left out take the same defaults as the loss constructors. Class
//! weights are written as `[label, weight]` pairs so that labels keep their type:
//!
//! ```json
//! { "loss": "cross_entropy", "class_weight": [[0, 2.0], [3, 0.5]] }
//! ```

use crate::error::ConfigError;
use crate::loss::{
    Absolute, BinaryFocalLoss, BinaryLossFn, Cauchy, CrossEntropy, EpsilonInsensitiveHinge,
    Hinge, Log, Poisson, Quantile, RegressionLossFn, Squared,
};

use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// The family of problems a loss applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Binary,
    MultiClass,
    Regression,
}

impl Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Task::Binary => "binary classification",
            Task::MultiClass => "multi-class classification",
            Task::Regression => "regression",
        })
    }
}

fn default_scale() -> f64 {
    Cauchy::default().scale()
}
fn default_eps() -> f64 {
    EpsilonInsensitiveHinge::default().eps()
}
fn default_alpha() -> f64 {
    Quantile::default().alpha()
}
fn default_weight() -> f64 {
    1.
}
fn default_gamma() -> f64 {
    BinaryFocalLoss::default().gamma()
}
fn default_beta() -> f64 {
    BinaryFocalLoss::default().beta()
}

/// (De)serializes a label map as a list of `[label, weight]` pairs.
///
/// JSON object keys are always strings, and the tagged enum below is buffered
/// before the variant is known, so a map would lose non-string label types.
mod class_weight_pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use std::collections::HashMap;
    use std::hash::Hash;

    pub fn serialize<L, S>(weights: &HashMap<L, f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        L: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(weights)
    }

    pub fn deserialize<'de, L, D>(deserializer: D) -> Result<HashMap<L, f64>, D::Error>
    where
        L: Deserialize<'de> + Eq + Hash,
        D: Deserializer<'de>,
    {
        let pairs: Vec<(L, f64)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

/// Loss kind together with its parameters. `L` is the label type of the multi-class losses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "loss", rename_all = "snake_case")]
#[serde(bound(
    serialize = "L: Serialize + Eq + Hash",
    deserialize = "L: Deserialize<'de> + Eq + Hash"
))]
pub enum LossConfig<L = String> {
    Absolute,
    Cauchy {
        #[serde(default = "default_scale")]
        scale: f64,
    },
    EpsilonInsensitiveHinge {
        #[serde(default = "default_eps")]
        eps: f64,
    },
    Quantile {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
    Squared,
    Poisson,
    Hinge,
    Log {
        #[serde(default = "default_weight")]
        weight_pos: f64,
        #[serde(default = "default_weight")]
        weight_neg: f64,
    },
    BinaryFocalLoss {
        #[serde(default = "default_gamma")]
        gamma: f64,
        #[serde(default = "default_beta")]
        beta: f64,
    },
    CrossEntropy {
        #[serde(default = "HashMap::new", with = "class_weight_pairs")]
        class_weight: HashMap<L, f64>,
    },
}

fn finite(loss: &'static str, param: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { loss, param, value })
    }
}

fn positive(loss: &'static str, param: &'static str, value: f64) -> Result<(), ConfigError> {
    if finite(loss, param, value)? > 0. {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            loss,
            param,
            value,
            expected: "positive",
        })
    }
}

fn non_negative(loss: &'static str, param: &'static str, value: f64) -> Result<(), ConfigError> {
    if finite(loss, param, value)? >= 0. {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            loss,
            param,
            value,
            expected: "non-negative",
        })
    }
}

impl<L> LossConfig<L> {
    /// Identifier of the configured loss, the same one [`Loss::name`](crate::loss::Loss::name) returns.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Cauchy { .. } => "cauchy",
            Self::EpsilonInsensitiveHinge { .. } => "epsilon_insensitive_hinge",
            Self::Quantile { .. } => "quantile",
            Self::Squared => "squared",
            Self::Poisson => "poisson",
            Self::Hinge => "hinge",
            Self::Log { .. } => "log",
            Self::BinaryFocalLoss { .. } => "binary_focal_loss",
            Self::CrossEntropy { .. } => "cross_entropy",
        }
    }

    pub fn task(&self) -> Task {
        match self {
            Self::Hinge | Self::Log { .. } | Self::BinaryFocalLoss { .. } => Task::Binary,
            Self::CrossEntropy { .. } => Task::MultiClass,
            _ => Task::Regression,
        }
    }

    fn wrong_task(&self, expected: Task) -> ConfigError {
        ConfigError::WrongTask {
            loss: self.name(),
            actual: self.task(),
            expected,
        }
    }
}

impl<L> LossConfig<L>
where
    L: Debug,
{
    /// Checks the parameters for values the loss formulas can't make sense of.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loss = self.name();
        match self {
            Self::Cauchy { scale } => positive(loss, "scale", *scale),
            Self::EpsilonInsensitiveHinge { eps } => non_negative(loss, "eps", *eps),
            Self::Quantile { alpha } => {
                let alpha = finite(loss, "alpha", *alpha)?;
                if !(0. ..=1.).contains(&alpha) {
                    return Err(ConfigError::OutOfRange {
                        loss,
                        param: "alpha",
                        value: alpha,
                        expected: "within [0, 1]",
                    });
                }
                if alpha == 0. || alpha == 1. {
                    warn!("Quantile loss with alpha={} only penalizes one side", alpha);
                }
                Ok(())
            }
            Self::Log {
                weight_pos,
                weight_neg,
            } => {
                non_negative(loss, "weight_pos", *weight_pos)?;
                non_negative(loss, "weight_neg", *weight_neg)
            }
            Self::BinaryFocalLoss { gamma, beta } => {
                positive(loss, "gamma", *gamma)?;
                finite(loss, "beta", *beta).map(|_| ())
            }
            Self::CrossEntropy { class_weight } => {
                for (label, weight) in class_weight {
                    if finite(loss, "class_weight", *weight)? < 0. {
                        warn!("Negative class weight {} for label {:?}", weight, label);
                    }
                }
                Ok(())
            }
            Self::Absolute | Self::Squared | Self::Poisson | Self::Hinge => Ok(()),
        }
    }

    pub fn build_binary(&self) -> Result<BinaryLossFn, ConfigError> {
        let loss: BinaryLossFn = match *self {
            Self::Hinge => Hinge.into(),
            Self::Log {
                weight_pos,
                weight_neg,
            } => Log::new(weight_pos, weight_neg).into(),
            Self::BinaryFocalLoss { gamma, beta } => BinaryFocalLoss::new(gamma, beta).into(),
            _ => return Err(self.wrong_task(Task::Binary)),
        };
        self.validate()?;
        debug!("Built binary loss {}", loss);
        Ok(loss)
    }

    pub fn build_regression(&self) -> Result<RegressionLossFn, ConfigError> {
        let loss: RegressionLossFn = match *self {
            Self::Absolute => Absolute.into(),
            Self::Cauchy { scale } => Cauchy::new(scale).into(),
            Self::EpsilonInsensitiveHinge { eps } => EpsilonInsensitiveHinge::new(eps).into(),
            Self::Quantile { alpha } => Quantile::new(alpha).into(),
            Self::Squared => Squared.into(),
            Self::Poisson => Poisson.into(),
            _ => return Err(self.wrong_task(Task::Regression)),
        };
        self.validate()?;
        debug!("Built regression loss {}", loss);
        Ok(loss)
    }
}

impl<L> LossConfig<L>
where
    L: Eq + Hash + Clone + Debug + Ord,
{
    pub fn build_multiclass(&self) -> Result<CrossEntropy<L>, ConfigError> {
        let loss = match self {
            Self::CrossEntropy { class_weight } => CrossEntropy::new(class_weight.clone()),
            _ => return Err(self.wrong_task(Task::MultiClass)),
        };
        self.validate()?;
        debug!("Built multi-class loss {}", loss);
        Ok(loss)
    }
}

impl<L> LossConfig<L>
where
    L: DeserializeOwned + Eq + Hash,
{
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config)
    }
}

impl<L> LossConfig<L>
where
    L: Serialize + Eq + Hash,
{
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<L> Default for LossConfig<L> {
    fn default() -> Self {
        Self::Squared
    }
}

impl From<&RegressionLossFn> for LossConfig {
    fn from(loss: &RegressionLossFn) -> Self {
        match loss {
            RegressionLossFn::Absolute(_) => Self::Absolute,
            RegressionLossFn::Cauchy(l) => Self::Cauchy { scale: l.scale() },
            RegressionLossFn::EpsilonInsensitiveHinge(l) => {
                Self::EpsilonInsensitiveHinge { eps: l.eps() }
            }
            RegressionLossFn::Quantile(l) => Self::Quantile { alpha: l.alpha() },
            RegressionLossFn::Squared(_) => Self::Squared,
            RegressionLossFn::Poisson(_) => Self::Poisson,
        }
    }
}

impl From<&BinaryLossFn> for LossConfig {
    fn from(loss: &BinaryLossFn) -> Self {
        match loss {
            BinaryLossFn::Hinge(_) => Self::Hinge,
            BinaryLossFn::Log(l) => Self::Log {
                weight_pos: l.weight_pos(),
                weight_neg: l.weight_neg(),
            },
            BinaryLossFn::BinaryFocalLoss(l) => Self::BinaryFocalLoss {
                gamma: l.gamma(),
                beta: l.beta(),
            },
        }
    }
}
