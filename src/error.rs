//! Crate-level error wrapping the module errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::nn::NnError;

/// Any failure of [`run`](crate::run).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Nn(#[from] NnError),
}
