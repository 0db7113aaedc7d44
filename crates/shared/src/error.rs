use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{amount::AmountError, domain::TxKind};

/// Failures surfaced by the raw wallet provider capability.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("no wallet provider is available")]
    Unavailable,
    #[error("user rejected the wallet prompt")]
    UserRejected,
    #[error("wallet provider error: {0}")]
    Rpc(String),
}

/// Failures establishing a wallet connection.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    #[error("no wallet extension detected; install one to continue")]
    ProviderUnavailable,
    #[error("user declined the connection request")]
    UserRejected,
    #[error("wallet provider failure: {0}")]
    Provider(String),
}

impl From<ProviderError> for ConnectError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => Self::ProviderUnavailable,
            ProviderError::UserRejected => Self::UserRejected,
            ProviderError::Rpc(message) => Self::Provider(message),
        }
    }
}

/// Failures in the donate/withdraw lifecycle. Validation variants are raised
/// before any wallet interaction; the rest at the operation boundary.
#[derive(Debug, Clone, Error)]
pub enum TxError {
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("enter a display name or donate anonymously")]
    InvalidName,
    #[error("a {} is already in progress", .0.label())]
    AlreadyInProgress(TxKind),
    #[error("user rejected the signature prompt")]
    UserRejected,
    #[error("transaction submission failed: {0}")]
    Submission(String),
    #[error("transaction reverted on chain: {0}")]
    Revert(String),
}

impl TxError {
    /// Maps a provider failure raised during signing/broadcast. A rejection
    /// at the signature prompt keeps its own kind; everything else is a
    /// generic, retriable submission failure.
    pub fn from_submission(err: ProviderError) -> Self {
        match err {
            ProviderError::UserRejected => Self::UserRejected,
            other => Self::Submission(other.to_string()),
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidAmount(_) => FailureKind::InvalidAmount,
            Self::InvalidName => FailureKind::InvalidName,
            Self::AlreadyInProgress(_) => FailureKind::AlreadyInProgress,
            Self::UserRejected => FailureKind::UserRejected,
            Self::Submission(_) => FailureKind::Submission,
            Self::Revert(_) => FailureKind::Revert,
        }
    }
}

/// A balance read failure. Never fatal: callers retain the last good value
/// and the next refresh cycle retries.
#[derive(Debug, Clone, Error)]
#[error("balance read failed: {0}")]
pub struct ReadError(pub String);

/// Flat projection of a lifecycle failure, carried on user-visible notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidAmount,
    InvalidName,
    AlreadyInProgress,
    UserRejected,
    Submission,
    Revert,
}
