//! Driven port for the HCS school search.

use async_trait::async_trait;

use super::HcsClientError;
use crate::domain::{EducationLevel, OrganizationCode, Region};

/// Search parameters for one school lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolSearchQuery {
    /// Free-text school name, sent URL-encoded.
    pub name: String,
    /// Region whose area code scopes the search.
    pub region: Region,
    /// Course level of the school.
    pub level: EducationLevel,
}

/// One school returned by the search, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolCandidate {
    /// Organization code of the candidate.
    pub org_code: OrganizationCode,
}

/// Port for listing schools matching a query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchoolDirectory: Send + Sync {
    /// Return every candidate the server lists, preserving its order.
    ///
    /// An empty vector is a valid answer; choosing among candidates is the
    /// caller's job.
    async fn search_schools(
        &self,
        query: &SchoolSearchQuery,
    ) -> Result<Vec<SchoolCandidate>, HcsClientError>;
}
