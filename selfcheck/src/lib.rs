//! Daily HCS self-check automation.
//!
//! The library resolves each roster student's school, negotiates an
//! authenticated session with the regional host and submits the "no symptoms"
//! questionnaire. The `selfcheck` binary wires the adapters below into the
//! domain runner.

pub mod config;
pub mod domain;
pub mod outbound;
