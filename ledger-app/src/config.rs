//! Configuration loading from environment.

use std::env;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub fx_base_url: String,
    pub fx_access_key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `FX_ACCESS_KEY` is deliberately optional here; conversion requests
    /// fail with a configuration error at call time when it is absent, so
    /// the rest of the API stays usable without a provider credential.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        // Zero-config runs get an ephemeral per-process database; point
        // DATABASE_URL at a file (sqlite://...) to persist across restarts.
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

        let fx_base_url = env::var("FX_BASE_URL")
            .unwrap_or_else(|_| fx_rates::DEFAULT_BASE_URL.to_string());

        let fx_access_key = env::var("FX_ACCESS_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            port,
            database_url,
            fx_base_url,
            fx_access_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_environment_yields_in_memory_defaults() {
        unsafe {
            env::remove_var("PORT");
            env::remove_var("DATABASE_URL");
            env::remove_var("FX_BASE_URL");
            env::remove_var("FX_ACCESS_KEY");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.fx_base_url, fx_rates::DEFAULT_BASE_URL);
        assert!(config.fx_access_key.is_none());
    }
}
