//! Three-step HCS session exchange.
//!
//! 1. `findUser` with the encrypted name and birth date yields an initial
//!    token.
//! 2. `selectUserGroup` with the initial token yields the participant number
//!    and an intermediate token.
//! 3. `getUserInfo` with the intermediate token yields the final token.
//!
//! Steps run strictly in order. The first failure aborts the exchange and no
//! later step is attempted; a retry has to start again from step 1.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{FindUserRequest, IdentityEncoder, SessionGateway};
use crate::domain::{
    NegotiationError, NegotiationStep, OrganizationCode, Region, StudentSession,
};

/// Domain service that turns a student identity into a [`StudentSession`].
pub struct SessionNegotiator<E: ?Sized, G: ?Sized> {
    encoder: Arc<E>,
    gateway: Arc<G>,
}

impl<E, G> SessionNegotiator<E, G>
where
    E: IdentityEncoder + ?Sized,
    G: SessionGateway + ?Sized,
{
    /// Create a negotiator from an identity encoder and a session gateway.
    pub fn new(encoder: Arc<E>, gateway: Arc<G>) -> Self {
        Self { encoder, gateway }
    }

    /// Run the exchange for one student.
    ///
    /// `birth` is only encrypted for step 1 and then kept in the returned
    /// session for record-keeping.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError`] naming the step that failed.
    pub async fn negotiate(
        &self,
        region: Region,
        org_code: &OrganizationCode,
        name: &str,
        birth: &str,
    ) -> Result<StudentSession, NegotiationError> {
        let request = FindUserRequest {
            name: self
                .encoder
                .encrypt(name)
                .map_err(NegotiationError::Encryption)?,
            birthday: self
                .encoder
                .encrypt(birth)
                .map_err(NegotiationError::Encryption)?,
            org_code: org_code.clone(),
        };

        let found = self
            .gateway
            .find_user(region, &request)
            .await
            .map_err(NegotiationError::remote(NegotiationStep::FindUser))?;
        debug!(region = %region, step = %NegotiationStep::FindUser, "initial token issued");

        let group = self
            .gateway
            .select_user_group(region, &found.token)
            .await
            .map_err(NegotiationError::remote(NegotiationStep::SelectUserGroup))?;
        debug!(region = %region, step = %NegotiationStep::SelectUserGroup, "user group selected");

        let token = self
            .gateway
            .get_user_info(region, &group.token, org_code, &group.user_pno)
            .await
            .map_err(NegotiationError::remote(NegotiationStep::GetUserInfo))?;
        debug!(region = %region, step = %NegotiationStep::GetUserInfo, "final token issued");

        // Servers that omit the echoed user name accept the ciphertext we sent.
        let user_name_token = found
            .user_name
            .unwrap_or_else(|| request.name.into_inner());

        Ok(StudentSession::new(
            found.organization_name,
            user_name_token,
            token,
            region,
            birth,
        ))
    }
}

#[cfg(test)]
#[path = "session_negotiator_tests.rs"]
mod tests;
