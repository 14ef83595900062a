use scholarshare_domain::idea::DomainError;

/// Client error taxonomy.
///
/// Verification errors (`InvalidCode`, `ExpiredCode`, `ResendUnavailable`)
/// are handled locally by the screen that triggered them. `MutationFailed`
/// means a write was rejected and local state was rolled back; it is never
/// retried automatically. `Transport` is the only transient variant; the
/// retry wrapper absorbs it up to its budget before it reaches the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid verification code")]
    InvalidCode,
    #[error("verification code has expired")]
    ExpiredCode,
    #[error("resend is not available while a code is still live")]
    ResendUnavailable,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("failed to send verification code")]
    DeliveryFailed {
        #[source]
        source: anyhow::Error,
    },
    #[error("another update for this idea is still in flight")]
    MutationInFlight,
    #[error("the server rejected the update")]
    MutationFailed {
        #[source]
        source: anyhow::Error,
    },
    #[error("not found")]
    NotFound,
    #[error("not permitted for this account type")]
    Forbidden,
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("network error")]
    Transport(#[from] anyhow::Error),
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCode => "INVALID_CODE",
            Self::ExpiredCode => "EXPIRED_CODE",
            Self::ResendUnavailable => "RESEND_UNAVAILABLE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::DeliveryFailed { .. } => "DELIVERY_FAILED",
            Self::MutationInFlight => "MUTATION_IN_FLIGHT",
            Self::MutationFailed { .. } => "MUTATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION",
            Self::Transport(_) => "TRANSPORT",
        }
    }

    /// Only transport failures are worth retrying; everything else is a
    /// definitive answer from the server or from local validation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Wrap a rejected write. Used by the mutation controller after rollback
    /// and by the verification flow when the completion action fails.
    pub fn mutation_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::MutationFailed {
            source: source.into(),
        }
    }

    pub fn delivery_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::DeliveryFailed {
            source: source.into(),
        }
    }
}
