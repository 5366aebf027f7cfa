//! Configuration loading and management.

use std::fmt;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use cpe_core::Increment;

/// Application configuration.
///
/// Session times are held as `HH:MM` strings and parsed at the point of
/// use so a malformed config value degrades the same way a malformed
/// flag does.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default credit rounding increment.
    pub increment: Increment,

    /// Default session start time of day (`HH:MM`).
    pub session_start: Option<String>,

    /// Default session end time of day (`HH:MM`).
    pub session_end: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("increment", &self.increment)
            .field("session_start", &self.session_start)
            .field("session_end", &self.session_end)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Precedence, lowest to highest: built-in defaults, the platform
    /// config file, an explicitly passed file, `CPE_*` environment
    /// variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs::config_dir().map(|p| p.join("cpe")) {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CPE_"));

        figment.extract()
    }
}
