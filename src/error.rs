use crate::config::Task;

use thiserror::Error;

/// Error raised when a [`LossConfig`](crate::config::LossConfig) can't be turned into a loss.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter '{param}' of the {loss} loss must be finite, got {value}")]
    NonFinite {
        loss: &'static str,
        param: &'static str,
        value: f64,
    },

    #[error("parameter '{param}' of the {loss} loss must be {expected}, got {value}")]
    OutOfRange {
        loss: &'static str,
        param: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{loss} is a {actual} loss, a {expected} loss was requested")]
    WrongTask {
        loss: &'static str,
        actual: Task,
        expected: Task,
    },
}
