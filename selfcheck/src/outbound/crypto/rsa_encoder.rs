//! RSA PKCS#1 v1.5 identity encoder keyed by the service's public key.
//!
//! The service only accepts names and birth dates encrypted with its own
//! 2048-bit public key. Ciphertext is sent as standard, padded base64.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::domain::EncryptedField;
use crate::domain::ports::{IdentityEncoder, IdentityEncoderError};

/// Base64 DER (SubjectPublicKeyInfo) of the service's RSA public key.
pub const EMBEDDED_PUBLIC_KEY: &str = concat!(
    "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA81dCnCKt0NVH7j5Oh2+SGgEU0aqi5u6s",
    "YXemouJWXOlZO3jqDsHYM1qfEjVvCOmeoMNFXYSXdNhflU7mjWP8jWUmkYIQ8o3FGqMzsMTNxr+b",
    "Ap0cULWu9eYmycjJwWIxxB7vUwvpEUNicgW7v5nCwmF5HS33Hmn7yDzcfjfBs99K5xJEppHG0qc+",
    "q3YXxxPpwZNIRFn0Wtxt0Muh1U8avvWyw03uQ/wMBnzhwUC8T4G5NclLEWzOQExbQ4oDlZBv8BM/",
    "WxxuOyu0I8bDUDdutJOfREYRZBlazFHvRKNNQQD2qDfjRz484uFs7b5nykjaMB9k/EJAuHjJzGs9",
    "MMMWtQIDAQAB",
);

/// [`IdentityEncoder`] backed by an RSA public key.
#[derive(Debug, Clone)]
pub struct RsaIdentityEncoder {
    key: RsaPublicKey,
}

impl RsaIdentityEncoder {
    /// Parse the embedded service key.
    ///
    /// Call once at startup; a failure here means the build is broken and no
    /// student can be processed.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityEncoderError::InvalidKey`] when the embedded text is
    /// not base64 or not an RSA SubjectPublicKeyInfo.
    pub fn from_embedded() -> Result<Self, IdentityEncoderError> {
        let der = STANDARD.decode(EMBEDDED_PUBLIC_KEY).map_err(|error| {
            IdentityEncoderError::invalid_key(format!("embedded key is not base64: {error}"))
        })?;
        Self::from_public_key_der(&der)
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityEncoderError::InvalidKey`] when `der` is not an RSA
    /// public key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, IdentityEncoderError> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|error| IdentityEncoderError::invalid_key(error.to_string()))?;
        Ok(Self { key })
    }
}

impl IdentityEncoder for RsaIdentityEncoder {
    fn encrypt(&self, plaintext: &str) -> Result<EncryptedField, IdentityEncoderError> {
        let ciphertext = self
            .key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
            .map_err(|error| IdentityEncoderError::encryption(error.to_string()))?;
        Ok(EncryptedField::new(STANDARD.encode(ciphertext)))
    }
}
