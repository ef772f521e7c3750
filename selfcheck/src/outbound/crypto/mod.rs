//! Identity field encryption adapters.

mod rsa_encoder;

pub use rsa_encoder::{EMBEDDED_PUBLIC_KEY, RsaIdentityEncoder};
