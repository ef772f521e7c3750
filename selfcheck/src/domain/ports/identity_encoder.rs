//! Driven port for encrypting identity fields before they leave the process.

use super::define_port_error;
use crate::domain::{EncryptedField, ErrorKind};

define_port_error! {
    /// Errors raised by identity encoders.
    pub enum IdentityEncoderError {
        /// The public key could not be decoded or is not an RSA key.
        InvalidKey { message: String } =>
            "identity encryption key is unusable: {message}",
        /// Encrypting one value failed (for example, it is too long for the key).
        Encryption { message: String } =>
            "identity field encryption failed: {message}",
    }
}

impl IdentityEncoderError {
    /// Classify the error into the run-level error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey { .. } => ErrorKind::Configuration,
            Self::Encryption { .. } => ErrorKind::Encryption,
        }
    }
}

/// Port for turning a plaintext identity field into transmittable ciphertext.
///
/// Implementations must be randomised: encrypting the same text twice yields
/// different ciphertexts.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityEncoder: Send + Sync {
    /// Encrypt `plaintext` (a name or a birth date).
    fn encrypt(&self, plaintext: &str) -> Result<EncryptedField, IdentityEncoderError>;
}
