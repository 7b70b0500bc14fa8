use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all stagehand operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StagehandError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or contradictory configuration (credentials, profile id, key material).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Pass the value as a flag, an environment variable, or in ~/.stagehand/config.toml"))]
    Config { message: String },

    /// The repository manager answered with a non-success HTTP status.
    #[error("{operation} failed with HTTP {status}: {body}")]
    RemoteApi {
        operation: String,
        status: u16,
        body: String,
    },

    /// The request never produced an HTTP status (DNS, TLS, connection reset...).
    #[error("Network error: {message}")]
    Network { message: String },

    /// Key material could not be decoded, unlocked, or used to sign.
    #[error("Signing failed: {message}")]
    #[diagnostic(help("Check that the key is an armored secret key and that the passphrase is correct"))]
    Signing { message: String },

    /// A POM file could not be read or patched.
    #[error("POM error: {message}")]
    Pom { message: String },

    /// A lifecycle transition was requested from a state that does not allow it.
    #[error("Cannot {action} staging repository '{repository_id}': it is {observed}")]
    InvalidTransition {
        repository_id: String,
        action: String,
        observed: String,
    },

    /// The repository did not reach `closed` within the configured number of polls.
    #[error("Staging repository '{repository_id}' was not closed after {attempts} polls")]
    #[diagnostic(help("Inspect the repository in the Nexus UI, then retry `close-and-release` or `drop` it"))]
    CloseTimeout { repository_id: String, attempts: u32 },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type StagehandResult<T> = miette::Result<T>;
