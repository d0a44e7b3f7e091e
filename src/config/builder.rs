//! Build [`Config`] from environment variables.
//!
//! Uses [`env_string`], [`env_parsed`] and [`env_list`] so that key names live in one
//! place (the `constants` submodule) and every failure is a typed [`ConfigError`].

use super::constants::{
    ENV_INIT_STD, ENV_INPUTS, ENV_INPUT_COUNT, ENV_LAYER_SIZES, ENV_PREFIX, ENV_PRINT_TOPOLOGY,
    ENV_RECTIFIER, ENV_SEED, ENV_TARGETS, LIST_SEPARATOR,
};
use super::{Config, ConfigError};
use std::env::VarError;
use std::fmt;
use std::str::FromStr;

/// Prefixed variable name, `SEED` becomes `MICRODNN_SEED`.
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Looks up `key`: unset is `Ok(None)`; a value that is not Unicode is [`ConfigError::EnvVar`].
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    std::env::var(key).map(Some).or_else(|err| match err {
        VarError::NotPresent => Ok(None),
        VarError::NotUnicode(_) => Err(ConfigError::EnvVar {
            key: key.to_owned(),
            message: err.to_string(),
        }),
    })
}

/// Trimmed value of `key` converted with [`FromStr`]; a failed conversion is [`ConfigError::Parse`].
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_string(key)?
        .map(|raw| {
            raw.trim().parse().map_err(|err: T::Err| ConfigError::Parse {
                key: key.to_owned(),
                message: err.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

/// Reads a comma-separated list (e.g. `4, 4, 1`) and parses every element into `T`.
///
/// An empty or whitespace-only value yields an empty list.
pub fn env_list<T>(key: &str) -> Result<Option<Vec<T>>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    if s.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }
    s.split(LIST_SEPARATOR)
        .map(|item| {
            item.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
                key: key.to_string(),
                value: s.clone(),
                message: format!("element {:?}: {e}", item.trim()),
            })
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
}

/// Builds [`Config`] from environment variables, falling back to [`Config::default`] for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse (e.g. `MICRODNN_SEED=abc`).
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let input_count =
        env_parsed::<usize>(&env_key(ENV_INPUT_COUNT))?.unwrap_or(default.input_count);
    let layer_sizes = env_list::<usize>(&env_key(ENV_LAYER_SIZES))?.unwrap_or(default.layer_sizes);
    let init_std = env_parsed::<f64>(&env_key(ENV_INIT_STD))?.unwrap_or(default.init_std);
    let rectifier = env_parsed(&env_key(ENV_RECTIFIER))?.unwrap_or(default.rectifier);
    let inputs = env_list::<f64>(&env_key(ENV_INPUTS))?.unwrap_or(default.inputs);
    let targets = env_list::<f64>(&env_key(ENV_TARGETS))?.unwrap_or(default.targets);
    let print_topology =
        env_parsed::<bool>(&env_key(ENV_PRINT_TOPOLOGY))?.unwrap_or(default.print_topology);

    Ok(Config {
        seed,
        input_count,
        layer_sizes,
        init_std,
        rectifier,
        inputs,
        targets,
        print_topology,
    })
}
