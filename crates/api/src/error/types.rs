//! Error type definitions for agreement operations

use thiserror::Error as ThisError;

/// Primary error type for agreement operations
///
/// Every variant is terminal for the attempt that produced it: the engine
/// never retries and never substitutes a default secret.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// A key or message belongs to a different algorithm family than expected
    #[error("type mismatch: {context}: {message}")]
    TypeMismatch {
        context: &'static str,
        message: String,
    },

    /// A handshake message failed structural or shape validation
    #[error("malformed message: {context}: {message}")]
    MalformedMessage {
        context: &'static str,
        message: String,
    },

    /// The peer negotiated a different pattern, role or composite layout
    #[error("agreement mismatch: {context}: {message}")]
    AgreementMismatch {
        context: &'static str,
        message: String,
    },

    /// Signature or key-confirmation check failed
    ///
    /// Carries no detail beyond the operation that failed.
    #[error("authentication failed: {context}")]
    AuthenticationFailed { context: &'static str },

    /// The raw primitive refused its inputs (bad point, low-order result)
    #[error("computation failure: {context}: {message}")]
    ComputationFailure {
        context: &'static str,
        message: String,
    },

    /// Invalid length error with context
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid parameter error
    #[error("{context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: String,
    },

    /// Invalid key error
    #[error("invalid key: {context}: {message}")]
    InvalidKey {
        context: &'static str,
        message: String,
    },

    /// Not implemented error
    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },
}

/// Fieldless discriminant of [`Error`], for matching and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    MalformedMessage,
    AgreementMismatch,
    AuthenticationFailed,
    ComputationFailure,
    InvalidLength,
    InvalidParameter,
    InvalidKey,
    NotImplemented,
}

/// Result type for agreement operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::TypeMismatch`]
    pub fn type_mismatch(context: &'static str, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            context,
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::MalformedMessage`]
    pub fn malformed(context: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            context,
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::AgreementMismatch`]
    pub fn mismatch(context: &'static str, message: impl Into<String>) -> Self {
        Self::AgreementMismatch {
            context,
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::ComputationFailure`]
    pub fn computation(context: &'static str, message: impl Into<String>) -> Self {
        Self::ComputationFailure {
            context,
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InvalidParameter`]
    pub fn parameter(context: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            context,
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InvalidKey`]
    pub fn invalid_key(context: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            context,
            message: message.into(),
        }
    }

    /// The variant of this error without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::MalformedMessage { .. } => ErrorKind::MalformedMessage,
            Self::AgreementMismatch { .. } => ErrorKind::AgreementMismatch,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::ComputationFailure { .. } => ErrorKind::ComputationFailure,
            Self::InvalidLength { .. } => ErrorKind::InvalidLength,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::InvalidKey { .. } => ErrorKind::InvalidKey,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }

    /// Replace the context of an existing error, keeping its message
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::TypeMismatch { message, .. } => Self::TypeMismatch { context, message },
            Self::MalformedMessage { message, .. } => Self::MalformedMessage { context, message },
            Self::AgreementMismatch { message, .. } => Self::AgreementMismatch { context, message },
            Self::AuthenticationFailed { .. } => Self::AuthenticationFailed { context },
            Self::ComputationFailure { message, .. } => {
                Self::ComputationFailure { context, message }
            }
            Self::InvalidLength {
                expected, actual, ..
            } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            Self::InvalidKey { message, .. } => Self::InvalidKey { context, message },
            Self::NotImplemented { feature } => Self::NotImplemented { feature },
        }
    }

    /// Replace the message of an existing error
    ///
    /// Authentication failures stay detail-free; the message is dropped.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::TypeMismatch { context, .. } => Self::TypeMismatch { context, message },
            Self::MalformedMessage { context, .. } => Self::MalformedMessage { context, message },
            Self::AgreementMismatch { context, .. } => Self::AgreementMismatch { context, message },
            Self::AuthenticationFailed { context } => Self::AuthenticationFailed { context },
            Self::ComputationFailure { context, .. } => {
                Self::ComputationFailure { context, message }
            }
            Self::InvalidLength {
                context,
                expected,
                actual,
            } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::InvalidParameter { context, .. } => Self::InvalidParameter { context, message },
            Self::InvalidKey { context, .. } => Self::InvalidKey { context, message },
            Self::NotImplemented { feature } => Self::NotImplemented { feature },
        }
    }
}
