//! The daily health questionnaire and its submission.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{SessionToken, StudentSession};
use crate::domain::ports::{HcsClientError, SurveyGateway};

/// Number of `rspnsNN` answer slots in the questionnaire.
pub const ANSWER_SLOTS: usize = 16;

/// A completed questionnaire, one optional answer per `rspnsNN` slot.
///
/// The wire shape (field names, nulls, string-typed answers) is owned by the
/// outbound adapter; this type only carries the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSurvey {
    answers: [Option<&'static str>; ANSWER_SLOTS],
    upper_token: SessionToken,
    upper_user_name: String,
}

impl HealthSurvey {
    /// "No symptoms, no exposure" answers for the given session.
    ///
    /// Slot 0 is `"Y"`, slots 1 and 2 are `"1"`, slot 9 is `"0"` and every
    /// other slot is unanswered.
    ///
    /// # Examples
    /// ```
    /// use selfcheck::domain::{HealthSurvey, Region, SessionToken, StudentSession};
    ///
    /// let session = StudentSession::new(
    ///     None,
    ///     "ENCRYPTED-NAME",
    ///     SessionToken::new("final"),
    ///     Region::Seoul,
    ///     "20050101",
    /// );
    /// let survey = HealthSurvey::all_healthy(&session);
    /// assert_eq!(survey.answer(0), Some("Y"));
    /// assert_eq!(survey.answer(3), None);
    /// assert_eq!(survey.upper_user_name(), "ENCRYPTED-NAME");
    /// ```
    pub fn all_healthy(session: &StudentSession) -> Self {
        let mut answers = [None; ANSWER_SLOTS];
        answers[0] = Some("Y");
        answers[1] = Some("1");
        answers[2] = Some("1");
        answers[9] = Some("0");
        Self {
            answers,
            upper_token: session.token().clone(),
            upper_user_name: session.user_name_token().to_owned(),
        }
    }

    /// Answer in slot `index`, `None` when unanswered or out of range.
    pub fn answer(&self, index: usize) -> Option<&'static str> {
        self.answers.get(index).copied().flatten()
    }

    /// All slots in order.
    pub fn answers(&self) -> &[Option<&'static str>; ANSWER_SLOTS] {
        &self.answers
    }

    /// Token echoed back as `upperToken`.
    pub fn upper_token(&self) -> &SessionToken {
        &self.upper_token
    }

    /// Encrypted user name echoed back as `upperUserNameEncpt`.
    pub fn upper_user_name(&self) -> &str {
        &self.upper_user_name
    }
}

/// Domain service posting the "all healthy" questionnaire.
pub struct SurveySubmitter<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G> SurveySubmitter<G>
where
    G: SurveyGateway + ?Sized,
{
    /// Create a submitter over a survey gateway adapter.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Submit the "all healthy" answers for `session`. Not retried.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error for a non-200 status or transport failure.
    pub async fn submit_all_healthy(&self, session: &StudentSession) -> Result<(), HcsClientError> {
        let survey = HealthSurvey::all_healthy(session);
        self.gateway
            .register_survey(session.region(), session.token(), &survey)
            .await?;
        debug!(region = %session.region(), "survey accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockSurveyGateway;
    use crate::domain::Region;

    fn session() -> StudentSession {
        StudentSession::new(
            Some("Test High School".to_owned()),
            "ENCRYPTED-NAME",
            SessionToken::new("final"),
            Region::Gyeongbuk,
            "20050101",
        )
    }

    #[test]
    fn all_healthy_answers_only_the_sentinel_slots() {
        let survey = HealthSurvey::all_healthy(&session());
        let answered: Vec<_> = survey
            .answers()
            .iter()
            .enumerate()
            .filter_map(|(slot, answer)| answer.map(|value| (slot, value)))
            .collect();
        assert_eq!(answered, [(0, "Y"), (1, "1"), (2, "1"), (9, "0")]);
        assert_eq!(survey.upper_token().expose(), "final");
        assert_eq!(survey.answer(ANSWER_SLOTS), None);
    }

    #[tokio::test]
    async fn submits_with_the_session_region_and_final_token() {
        let mut gateway = MockSurveyGateway::new();
        gateway
            .expect_register_survey()
            .withf(|region, token, survey| {
                *region == Region::Gyeongbuk
                    && token.expose() == "final"
                    && survey.upper_user_name() == "ENCRYPTED-NAME"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        SurveySubmitter::new(Arc::new(gateway))
            .submit_all_healthy(&session())
            .await
            .expect("submission should succeed");
    }

    #[tokio::test]
    async fn rejected_submission_is_reported_once_without_retry() {
        let mut gateway = MockSurveyGateway::new();
        gateway
            .expect_register_survey()
            .times(1)
            .returning(|_, _, _| Err(HcsClientError::status(500_u16, "internal error")));

        let error = SurveySubmitter::new(Arc::new(gateway))
            .submit_all_healthy(&session())
            .await
            .expect_err("non-200 must fail");
        assert_eq!(error, HcsClientError::status(500_u16, "internal error"));
    }
}
