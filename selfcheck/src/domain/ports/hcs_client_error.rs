//! Error contract shared by every HCS gateway port.

use super::define_port_error;
use crate::domain::ErrorKind;

define_port_error! {
    /// Errors surfaced while talking to the HCS API.
    pub enum HcsClientError {
        /// The request never produced a response.
        Transport { message: String } =>
            "hcs transport failed: {message}",
        /// The configured client timeout elapsed.
        Timeout { message: String } =>
            "hcs request timed out: {message}",
        /// The server answered with an unexpected status code.
        Status { status: u16, message: String } =>
            "hcs answered with status {status}: {message}",
        /// The response body was not valid JSON.
        Decode { message: String } =>
            "hcs response decode failed: {message}",
        /// The JSON was valid but a required field was missing or mistyped.
        Protocol { message: String } =>
            "hcs response violated the protocol: {message}",
        /// A lookup returned no data.
        NotFound { message: String } =>
            "hcs lookup found no data: {message}",
    }
}

impl HcsClientError {
    /// Classify the error into the run-level error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Status,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}
