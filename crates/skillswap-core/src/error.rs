// crates/skillswap-core/src/error.rs

use thiserror::Error;

/// Registry-wide error types for SkillSwap.
#[derive(Debug, Error)]
pub enum SkillError {
    /// The key/value store failed its readiness probe or a store call failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Bytes were present but did not parse as the expected structure.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The signer declined the write.
    #[error("user rejected transaction: {0}")]
    UserRejected(String),

    /// Any other failure from a write call.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Resource not found. The payload is the full user-facing message.
    #[error("{0}")]
    NotFound(String),

    /// Rating outside the 1-5 star range.
    #[error("Invalid rating: {0} (expected 1-5)")]
    InvalidRating(u8),

    /// A write was attempted without a connected wallet session.
    #[error("Please connect wallet first")]
    WalletNotConnected,

    /// An operation of the same kind is already pending.
    #[error("Operation already in progress: {0}")]
    OperationInProgress(String),

    /// The submission draft failed validation.
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    /// Cryptographic error (key loading, signing, verification).
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl SkillError {
    /// Whether this error originates from the signer declining a write.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, SkillError::UserRejected(_))
    }
}

impl From<serde_json::Error> for SkillError {
    fn from(e: serde_json::Error) -> Self {
        SkillError::DecodeError(e.to_string())
    }
}

impl From<base64::DecodeError> for SkillError {
    fn from(e: base64::DecodeError) -> Self {
        SkillError::DecodeError(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for SkillError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        SkillError::DecodeError(e.to_string())
    }
}

impl From<ed25519_dalek::SignatureError> for SkillError {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        SkillError::Crypto(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_classification() {
        assert!(SkillError::UserRejected("declined".into()).is_user_rejection());
        assert!(!SkillError::WriteFailed("gas".into()).is_user_rejection());
        assert!(!SkillError::StoreUnavailable("down".into()).is_user_rejection());
    }

    #[test]
    fn test_not_found_displays_message_only() {
        assert_eq!(
            SkillError::NotFound("Skill not found".into()).to_string(),
            "Skill not found"
        );
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: SkillError = serde_json::from_str::<Vec<String>>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, SkillError::DecodeError(_)));
    }
}
