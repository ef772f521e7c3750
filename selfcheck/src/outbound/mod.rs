//! Outbound adapters implementing the self-check domain ports.
//!
//! - **crypto**: RSA identity field encryption
//! - **hcs**: reqwest-backed HCS API client
//! - **log_file**: append-only submission log
//!
//! Adapters translate between domain types and wire or file formats. They
//! contain no business logic.

pub mod crypto;
pub mod hcs;
pub mod log_file;
