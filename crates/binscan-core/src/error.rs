use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Too many hex digits in pattern token '{0}'")]
    TooManyHexDigits(String),

    #[error("Operator without a value in pattern token '{0}'")]
    DanglingOperator(String),

    #[error("Unexpected character '{ch}' in pattern token '{token}'")]
    UnexpectedCharacter { token: String, ch: char },

    #[error("Pattern token '{token}' exceeds {limit} characters")]
    TokenTooLong { token: String, limit: usize },

    #[error("Pattern contains no tokens")]
    EmptyPattern,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error was raised while compiling a pattern token
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::TooManyHexDigits(_)
                | Error::DanglingOperator(_)
                | Error::UnexpectedCharacter { .. }
                | Error::TokenTooLong { .. }
        )
    }
}
