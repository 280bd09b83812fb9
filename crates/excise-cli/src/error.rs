//! Error types for excise-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for I/O, parse, and usage failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when strict mode finds a rule that did not match.
pub const EXIT_UNMATCHED: i32 = 2;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Rules(#[from] excise_rules::Error),

    #[error(transparent)]
    Fs(#[from] excise_fs::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML output error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Strict mode: at least one rule found nothing to remove
    #[error("{} rule(s) did not match: {}", missed.len(), missed.join(", "))]
    RulesNotMatched { missed: Vec<String> },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RulesNotMatched { .. } => EXIT_UNMATCHED,
            _ => EXIT_FAILURE,
        }
    }
}
