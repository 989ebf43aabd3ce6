//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;

use calc_core::DEFAULT_SCOPE;

/// Settings the runtime and its console transport start from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub command_prefix: String,
    pub load_on_start: bool,
    /// Scope used for input that does not name one.
    pub scope: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            command_prefix: "!".to_string(),
            load_on_start: true,
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLCALC_DATA_DIR` - Data directory (default: `./data`)
    /// - `PLCALC_COMMAND_PREFIX` - Command prefix (default: `!`)
    /// - `PLCALC_LOAD_ON_START` - Reload data at startup (default: true)
    /// - `PLCALC_SCOPE` - Console scope (default: `DEFAULT`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("PLCALC_DATA_DIR") {
            config.data_dir = dir;
        }

        if let Some(prefix) = read_env::<String>("PLCALC_COMMAND_PREFIX")
            && !prefix.is_empty()
        {
            config.command_prefix = prefix;
        }

        if let Some(load) = read_env_bool("PLCALC_LOAD_ON_START") {
            config.load_on_start = load;
        }

        if let Some(scope) = read_env::<String>("PLCALC_SCOPE")
            && !scope.is_empty()
        {
            config.scope = scope;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
