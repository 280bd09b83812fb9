//! Error types for excise-rules

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] excise_fs::Error),

    #[error("Unknown rule set: {id}")]
    UnknownRuleSet { id: String },

    #[error("Invalid rule set '{id}': {message}")]
    InvalidRuleSet { id: String, message: String },
}

impl Error {
    pub fn invalid(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRuleSet {
            id: id.into(),
            message: message.into(),
        }
    }
}
