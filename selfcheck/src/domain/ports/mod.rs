//! Domain ports: the edges the self-check domain expects adapters to fill.
//!
//! Each trait exposes a strongly typed error so adapters map their failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod hcs_client_error;
mod identity_encoder;
mod school_directory;
mod session_gateway;
mod submission_log;
mod survey_gateway;

pub use hcs_client_error::HcsClientError;
#[cfg(test)]
pub use identity_encoder::MockIdentityEncoder;
pub use identity_encoder::{IdentityEncoder, IdentityEncoderError};
#[cfg(test)]
pub use school_directory::MockSchoolDirectory;
pub use school_directory::{SchoolCandidate, SchoolDirectory, SchoolSearchQuery};
#[cfg(test)]
pub use session_gateway::MockSessionGateway;
pub use session_gateway::{FindUserRequest, FoundUser, SessionGateway, UserGroup};
#[cfg(test)]
pub use submission_log::MockSubmissionLog;
pub use submission_log::SubmissionLog;
#[cfg(test)]
pub use survey_gateway::MockSurveyGateway;
pub use survey_gateway::SurveyGateway;
