//! Environment-backed configuration.

use std::env;

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection details for the remote data store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Data store base address, e.g. `"https://example.supabase.co"`.
    pub base_url: String,

    /// Client API key sent with every request.
    pub api_key: String,
}

impl StoreConfig {
    /// Read the configuration from `STORE_URL` and `STORE_API_KEY`.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when either variable is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _env = dotenvy::dotenv();

        Ok(Self {
            base_url: required_var("STORE_URL")?,
            api_key: required_var("STORE_API_KEY")?,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_is_reported_by_name() {
        let result = required_var("PRESSBOOK_TEST_UNSET_VAR");

        assert!(matches!(result, Err(ConfigError::MissingVar(name)) if name.contains("UNSET")));
    }
}
