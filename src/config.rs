use crate::error::{config_error, env_error, TeamupResult};
use dotenvy::dotenv;
use std::env;

/// Environment variable holding the TeamUp API token
pub const TOKEN_VAR: &str = "TEAMUP_TOKEN";
/// Environment variable holding the bearer token
pub const BEARER_TOKEN_VAR: &str = "TEAMUP_BEARER_TOKEN";

/// Authentication secrets for the TeamUp API
#[derive(Debug, Clone)]
pub struct Config {
    /// Value for the `Teamup-Token` header
    pub api_token: String,
    /// Value for the `Authorization: Bearer` header
    pub bearer_token: String,
}

impl Config {
    /// Build a configuration from explicit secrets, rejecting empty ones
    pub fn new(api_token: impl Into<String>, bearer_token: impl Into<String>) -> TeamupResult<Self> {
        let api_token = api_token.into();
        let bearer_token = bearer_token.into();

        if api_token.is_empty() {
            return Err(config_error("TeamUp API token must not be empty"));
        }
        if bearer_token.is_empty() {
            return Err(config_error("TeamUp bearer token must not be empty"));
        }

        Ok(Config {
            api_token,
            bearer_token,
        })
    }

    /// Load configuration from environment variables
    ///
    /// Fails before any network call is attempted if either secret is
    /// missing, so misconfiguration surfaces at startup.
    pub fn load() -> TeamupResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let api_token = env::var(TOKEN_VAR).map_err(|_| env_error(TOKEN_VAR))?;
        let bearer_token = env::var(BEARER_TOKEN_VAR).map_err(|_| env_error(BEARER_TOKEN_VAR))?;

        Config::new(api_token, bearer_token)
    }
}
