//! Settings read from the environment.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Errors from reading the configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("the environment variable '{0}' must be set")]
    Missing(&'static str),

    /// The platform has no home or config directory.
    #[error("could not determine the platform config directory")]
    NoConfigDir,
}

/// Load `.env.local` and then `.env` from the working directory, if they exist.
///
/// Variables that are already set are left alone, so `.env.local` wins over `.env`.
pub fn load_env() {
    if let Err(error) = dotenv::from_filename(".env.local") {
        tracing::debug!("Did not load .env.local: {error}");
    }

    if let Err(error) = dotenv::dotenv() {
        tracing::debug!("Did not load .env: {error}");
    }
}

/// The location and public key of a hosted Supabase project.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    /// The project URL, e.g. "https://abc.supabase.co".
    pub url: String,
    /// The anonymous (public) API key.
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Read the config from `SUPABASE_URL` and `SUPABASE_ANON_KEY`, falling
    /// back to the `VITE_` prefixed names used by the web client.
    ///
    /// # Errors
    /// Returns [ConfigError::Missing] if either value is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [SupabaseConfig::from_env], reading variables with `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| {
            lookup(key)
                .or_else(|| lookup(&format!("VITE_{key}")))
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            url: read("SUPABASE_URL")?,
            anon_key: read("SUPABASE_ANON_KEY")?,
        })
    }
}

/// The per-user config directory, e.g. `~/.config/tally` on Linux.
///
/// # Errors
/// Returns [ConfigError::NoConfigDir] if the platform has no config directory.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("com", "Tally", "tally")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}
