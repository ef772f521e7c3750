//! Run-level error classification and the per-record pipeline error.
//!
//! Adapters report [`HcsClientError`] or [`IdentityEncoderError`]; domain
//! services wrap those with the stage that failed. [`ErrorKind`] gives the
//! batch driver one flat classification to log and to decide whether a
//! failure is fatal for the whole run.

use std::fmt;

use thiserror::Error;

use super::ports::{HcsClientError, IdentityEncoderError};
use super::student::InvalidRecord;

/// Flat classification of every failure the self-check can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Embedded key material or settings are unusable. Fatal for the run.
    Configuration,
    /// A single identity field could not be encrypted.
    Encryption,
    /// A lookup (school search) returned nothing.
    NotFound,
    /// A response body was not valid JSON.
    Decode,
    /// A response was valid JSON but lacked a required field.
    Protocol,
    /// The network call failed or timed out.
    Transport,
    /// The server answered with an unexpected status code.
    Status,
    /// A roster record was rejected before any request was made.
    InvalidRecord,
}

impl ErrorKind {
    /// Whether the whole run must stop rather than move to the next record.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Configuration)
    }

    /// Stable lower-case label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Encryption => "encryption",
            Self::NotFound => "not_found",
            Self::Decode => "decode",
            Self::Protocol => "protocol",
            Self::Transport => "transport",
            Self::Status => "status",
            Self::InvalidRecord => "invalid_record",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the session exchange that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationStep {
    /// Encrypting the name or birth date.
    Encryption,
    /// `findUser`: identity submission.
    FindUser,
    /// `selectUserGroup`: upgrade of the initial token.
    SelectUserGroup,
    /// `getUserInfo`: retrieval of the final token.
    GetUserInfo,
}

impl fmt::Display for NegotiationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encryption => "identity encryption",
            Self::FindUser => "findUser",
            Self::SelectUserGroup => "selectUserGroup",
            Self::GetUserInfo => "getUserInfo",
        })
    }
}

/// Failure of the session exchange; the whole exchange must restart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// An identity field could not be encrypted.
    #[error("session negotiation failed during identity encryption: {0}")]
    Encryption(#[source] IdentityEncoderError),
    /// A remote step failed.
    #[error("session negotiation failed during {step}: {source}")]
    Remote {
        /// Step that failed; later steps were not attempted.
        step: NegotiationStep,
        /// Adapter error for that step.
        #[source]
        source: HcsClientError,
    },
}

impl NegotiationError {
    /// Step at which the exchange stopped.
    pub fn step(&self) -> NegotiationStep {
        match self {
            Self::Encryption(_) => NegotiationStep::Encryption,
            Self::Remote { step, .. } => *step,
        }
    }

    /// Classify the error into the run-level error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encryption(error) => error.kind(),
            Self::Remote { source, .. } => source.kind(),
        }
    }

    pub(crate) fn remote(step: NegotiationStep) -> impl FnOnce(HcsClientError) -> Self {
        move |source| Self::Remote { step, source }
    }
}

/// Failure of one student's self-check, tagged with the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelfCheckError {
    /// The school could not be resolved to an organization code.
    #[error("school lookup failed: {0}")]
    SchoolLookup(#[source] HcsClientError),
    /// The session exchange failed.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    /// The survey was not accepted.
    #[error("survey submission failed: {0}")]
    Submission(#[source] HcsClientError),
    /// The roster record could not be used.
    #[error("roster record rejected: {0}")]
    InvalidRecord(#[source] InvalidRecord),
}

impl SelfCheckError {
    /// Classify the error into the run-level error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchoolLookup(error) | Self::Submission(error) => error.kind(),
            Self::Negotiation(error) => error.kind(),
            Self::InvalidRecord(_) => ErrorKind::InvalidRecord,
        }
    }
}
