pub mod config;
pub mod error;
pub mod loss;
pub mod math;

pub use config::{LossConfig, Task};
pub use error::ConfigError;
pub use loss::{
    Absolute, BinaryFocalLoss, BinaryLoss, BinaryLossFn, Cauchy, CrossEntropy,
    EpsilonInsensitiveHinge, Hinge, Log, Loss, MultiClassLoss, Poisson, Quantile,
    RegressionLoss, RegressionLossFn, Squared,
};
