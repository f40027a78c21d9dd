mod basic;
mod engine;

pub use basic::BasicConfig;
pub use engine::EngineConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Inference engine settings (see `engine` table in config.toml).
    #[serde(default)]
    pub engine: EngineConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CASTOR_";

impl Config {
    /// Builds a Figment merging defaults, an optional config TOML file, and
    /// `CASTOR_`-prefixed environment variables (e.g. `CASTOR_BASIC__DATABASE_URL`,
    /// `CASTOR_ENGINE__BASE_URL`). Environment wins over the file.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, `config.toml` if present, and the
    /// environment.
    pub fn load() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + config.toml + env): {err}")
        })
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);
