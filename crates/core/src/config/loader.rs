use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "CONCERTS_";

/// Separates section from key in override names, so keys may contain `_`.
///
/// `CONCERTS_SERVER__PORT=9000` sets `server.port` and
/// `CONCERTS_TICKETING__TIMEOUT_SECS=3` sets `ticketing.timeout_secs`.
pub const ENV_SEPARATOR: &str = "__";

/// Read the TOML file at `path`, then apply `CONCERTS_*` overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
        .extract::<Config>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parse a TOML document without consulting the environment.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
