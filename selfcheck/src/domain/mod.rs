//! Self-check domain: value types, services and the ports they depend on.
//!
//! Purpose: keep the HCS exchange rules (school resolution, the three-step
//! session negotiation, the fixed questionnaire and batch pacing) free of any
//! HTTP, crypto or filesystem detail. Adapters under `crate::outbound` fill
//! the ports.
//!
//! Public surface:
//! - Region, EducationLevel: the enumerations selecting hosts and search
//!   parameters.
//! - StudentIdentity, StudentSession and token newtypes.
//! - BatchRecord: one roster position, a student or a rejected record.
//! - SchoolResolver, SessionNegotiator, SurveySubmitter: single-step services.
//! - SelfCheckRunner: the sequential batch driver.

mod education_level;
mod error;
pub mod ports;
mod region;
mod school_resolver;
mod self_check_runner;
mod session_negotiator;
mod student;
mod survey;

pub use self::education_level::{EducationLevel, EducationLevelParseError};
pub use self::error::{ErrorKind, NegotiationError, NegotiationStep, SelfCheckError};
pub use self::region::{Region, RegionParseError};
pub use self::school_resolver::SchoolResolver;
pub use self::self_check_runner::{
    BatchSummary, DelayJitter, PacingSleeper, RUN_SEPARATOR, SelfCheckConfig, SelfCheckPorts,
    SelfCheckRunner, SelfCheckRuntime, TokioSleeper, UniformDelayJitter,
};
pub use self::session_negotiator::SessionNegotiator;
pub use self::student::{
    BatchRecord, EncryptedField, InvalidRecord, OrganizationCode, SessionToken, StudentIdentity,
    StudentSession,
};
pub use self::survey::{ANSWER_SLOTS, HealthSurvey, SurveySubmitter};
