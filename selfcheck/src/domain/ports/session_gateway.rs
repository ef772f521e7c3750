//! Driven port for the three-call HCS session exchange.
//!
//! Each call consumes the token issued by the previous one. The port only
//! models single calls; ordering and abort-on-failure live in
//! [`crate::domain::SessionNegotiator`].

use async_trait::async_trait;

use super::HcsClientError;
use crate::domain::{EncryptedField, OrganizationCode, Region, SessionToken};

/// Payload of the identity submission (`findUser`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindUserRequest {
    /// Encrypted student name.
    pub name: EncryptedField,
    /// Encrypted birth date.
    pub birthday: EncryptedField,
    /// School the student belongs to.
    pub org_code: OrganizationCode,
}

/// Partial student record returned by `findUser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundUser {
    /// School display name, when the server includes it.
    pub organization_name: Option<String>,
    /// Server-side (encrypted) user name, when the server includes it.
    pub user_name: Option<String>,
    /// Initial token, valid only for `selectUserGroup`.
    pub token: SessionToken,
}

/// First user group returned by `selectUserGroup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserGroup {
    /// Participant number of the student within the group.
    pub user_pno: String,
    /// Intermediate token, valid only for `getUserInfo`.
    pub token: SessionToken,
}

/// Port for the region-scoped session exchange endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Submit the encrypted identity and receive the initial token.
    async fn find_user(
        &self,
        region: Region,
        request: &FindUserRequest,
    ) -> Result<FoundUser, HcsClientError>;

    /// Trade the initial token for the first user group.
    async fn select_user_group(
        &self,
        region: Region,
        token: &SessionToken,
    ) -> Result<UserGroup, HcsClientError>;

    /// Trade the intermediate token for the final session token.
    async fn get_user_info(
        &self,
        region: Region,
        token: &SessionToken,
        org_code: &OrganizationCode,
        user_pno: &str,
    ) -> Result<SessionToken, HcsClientError>;
}
