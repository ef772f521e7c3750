//! Driven port for registering the daily survey.

use async_trait::async_trait;

use super::HcsClientError;
use crate::domain::{HealthSurvey, Region, SessionToken};

/// Port for posting a completed survey.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurveyGateway: Send + Sync {
    /// Post `survey` authenticated with the final session token.
    ///
    /// Succeeds only when the server answers exactly `200 OK`.
    async fn register_survey(
        &self,
        region: Region,
        token: &SessionToken,
        survey: &HealthSurvey,
    ) -> Result<(), HcsClientError>;
}
