use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(teamup::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(teamup::config))]
    Config(String),

    #[error("Contract violation: {0}")]
    #[diagnostic(code(teamup::contract))]
    Contract(String),

    /// Non-2xx response from the TeamUp API, carrying everything needed
    /// to diagnose the failed call.
    #[error("Failed to {method} for url -> {url}: {status} - {body}")]
    #[diagnostic(code(teamup::api))]
    Api {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP transport error: {0}")]
    #[diagnostic(code(teamup::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(teamup::serialization))]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(teamup::io))]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with our Error type
pub type TeamupResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create contract violation errors
pub fn contract_error(message: &str) -> Error {
    Error::Contract(message.to_string())
}
