//! Resolves a school name to the organization code the other steps need.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{HcsClientError, SchoolDirectory, SchoolSearchQuery};
use crate::domain::{EducationLevel, OrganizationCode, Region};

/// First-match school resolver.
///
/// When several schools share a name the server's first candidate wins; there
/// is no fuzzy matching or disambiguation.
pub struct SchoolResolver<D: ?Sized> {
    directory: Arc<D>,
}

impl<D> SchoolResolver<D>
where
    D: SchoolDirectory + ?Sized,
{
    /// Create a resolver over a school directory adapter.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Look up `name` in `region` at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`HcsClientError::NotFound`] when the search lists no schools
    /// and passes through the adapter's decode and transport errors.
    pub async fn resolve(
        &self,
        name: &str,
        region: Region,
        level: EducationLevel,
    ) -> Result<OrganizationCode, HcsClientError> {
        let query = SchoolSearchQuery {
            name: name.to_owned(),
            region,
            level,
        };
        let candidates = self.directory.search_schools(&query).await?;
        debug!(
            region = %region,
            level = %level,
            candidates = candidates.len(),
            "school search answered"
        );

        candidates
            .into_iter()
            .next()
            .map(|candidate| candidate.org_code)
            .ok_or_else(|| {
                HcsClientError::not_found(format!(
                    "no school named '{name}' in {region} at level {level}"
                ))
            })
    }
}
