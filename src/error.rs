//! Error taxonomy for the POS frontend.
//!
//! Every failure is terminal to the operation that raised it but non-fatal
//! to the screen: the UI shows the message inline and the user corrects and
//! retries. Errors are stringified at the IPC boundary, so the variants
//! exist for the domain layer and tests rather than for the wire.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosError {
    /// Invalid in-progress selection. Blocks the add-line action; no state
    /// change has occurred.
    #[error("{0}")]
    Selection(String),

    /// Missing or malformed required input before an operation. Blocks the
    /// operation locally; no network call is made.
    #[error("{0}")]
    Validation(String),

    /// Remote call failed (transport or non-2xx). In-progress state is
    /// preserved so the user can retry.
    #[error("{0}")]
    Submission(String),

    /// Login rejected. Session state is left untouched.
    #[error("{0}")]
    Auth(String),
}

impl PosError {
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Stable kind tag, used in logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Selection(_) => "selection",
            Self::Validation(_) => "validation",
            Self::Submission(_) => "submission",
            Self::Auth(_) => "auth",
        }
    }
}

pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(PosError::selection("x").kind(), "selection");
        assert_eq!(PosError::validation("x").kind(), "validation");
        assert_eq!(PosError::submission("x").kind(), "submission");
        assert_eq!(PosError::auth("x").kind(), "auth");
    }

    #[test]
    fn display_is_the_plain_message() {
        let err = PosError::selection("choose exactly one meal kind");
        assert_eq!(err.to_string(), "choose exactly one meal kind");
    }
}
