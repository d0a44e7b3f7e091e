//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `MICRODNN_SEED`).
pub(crate) const ENV_PREFIX: &str = "MICRODNN_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_INPUT_COUNT: &str = "INPUT_COUNT";
pub(crate) const ENV_LAYER_SIZES: &str = "LAYER_SIZES";
pub(crate) const ENV_INIT_STD: &str = "INIT_STD";
pub(crate) const ENV_RECTIFIER: &str = "RECTIFIER";
pub(crate) const ENV_INPUTS: &str = "INPUTS";
pub(crate) const ENV_TARGETS: &str = "TARGETS";
pub(crate) const ENV_PRINT_TOPOLOGY: &str = "PRINT_TOPOLOGY";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 69;
pub(crate) const DEFAULT_INPUT_COUNT: usize = 2;
pub(crate) const DEFAULT_LAYER_SIZES: &[usize] = &[1];
pub(crate) const DEFAULT_INIT_STD: f64 = 0.1;
pub(crate) const DEFAULT_INPUTS: &[f64] = &[3.0, 4.0];
pub(crate) const DEFAULT_TARGETS: &[f64] = &[2.0];
pub(crate) const DEFAULT_PRINT_TOPOLOGY: bool = true;

/// Separator for list-valued variables (`MICRODNN_LAYER_SIZES=4,4,1`).
pub(crate) const LIST_SEPARATOR: char = ',';
