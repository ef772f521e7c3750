//! URL layout of the HCS API.
//!
//! School search runs on one shared host. Every other call goes to the
//! region's own host, built from a base URL template in which `{region}` is
//! replaced by the region subdomain (`https://{region}hcs.eduro.go.kr` in
//! production). All URLs are built and validated once, when the endpoints are
//! created.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;
use url::Url;

use crate::domain::ports::SchoolSearchQuery;
use crate::domain::Region;

/// Shared host serving the school search.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://hcs.eduro.go.kr";
/// Base URL template of the per-region hosts.
pub const DEFAULT_REGION_BASE_TEMPLATE: &str = "https://{region}hcs.eduro.go.kr";
/// Placeholder replaced by the region subdomain in a region base template.
pub const REGION_PLACEHOLDER: &str = "{region}";

const SEARCH_SCHOOL_PATH: &str = "v2/searchSchool";
const FIND_USER_PATH: &str = "v2/findUser";
const SELECT_USER_GROUP_PATH: &str = "v2/selectUserGroup";
const GET_USER_INFO_PATH: &str = "v2/getUserInfo";
// The server spells the survey endpoint this way.
const REGISTER_SURVEY_PATH: &str = "registerServey";

/// Bytes left as-is in a query value: ASCII alphanumerics and `-_.~`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors raised while assembling endpoint URLs from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HcsEndpointsError {
    /// The search base URL does not parse or cannot carry a path.
    #[error("invalid school search base URL `{url}`: {message}")]
    SearchBase {
        /// Rejected input.
        url: String,
        /// Parser diagnostic.
        message: String,
    },
    /// A region base URL built from the template does not parse.
    #[error("invalid host for region {region}: {message}")]
    RegionHost {
        /// Region whose host was rejected.
        region: Region,
        /// Parser diagnostic.
        message: String,
    },
}

#[derive(Debug, Clone)]
struct RegionEndpoints {
    find_user: Url,
    select_user_group: Url,
    get_user_info: Url,
    register_survey: Url,
}

/// Pre-validated HCS endpoint URLs.
#[derive(Debug, Clone)]
pub struct HcsEndpoints {
    search_school: Url,
    regions: HashMap<Region, RegionEndpoints>,
}

impl HcsEndpoints {
    /// Build endpoints for the production hosts.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in hosts; the signature matches
    /// [`HcsEndpoints::new`].
    pub fn production() -> Result<Self, HcsEndpointsError> {
        Self::new(DEFAULT_SEARCH_BASE_URL, DEFAULT_REGION_BASE_TEMPLATE)
    }

    /// Build endpoints from a search base URL and a region base template.
    ///
    /// A template without `{region}` sends every region to the same base,
    /// which is how a local test server is targeted.
    ///
    /// # Errors
    ///
    /// Returns [`HcsEndpointsError`] when any resulting URL is invalid.
    pub fn new(search_base: &str, region_base_template: &str) -> Result<Self, HcsEndpointsError> {
        let search_error = |message: String| HcsEndpointsError::SearchBase {
            url: search_base.to_owned(),
            message,
        };
        let base = Url::parse(search_base).map_err(|error| search_error(error.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(search_error("URL cannot carry a path".to_owned()));
        }
        let search_school = join(&base, SEARCH_SCHOOL_PATH).map_err(search_error)?;

        let regions = Region::ALL
            .iter()
            .map(|&region| {
                region_endpoints(region, region_base_template)
                    .map(|endpoints| (region, endpoints))
                    .map_err(|message| HcsEndpointsError::RegionHost { region, message })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            search_school,
            regions,
        })
    }

    /// School search URL with the query string for `query`.
    ///
    /// Spaces in the school name become `+`; every byte other than ASCII
    /// alphanumerics and `-_.~` is percent-encoded.
    pub fn search_school(&self, query: &SchoolSearchQuery) -> Url {
        let mut url = self.search_school.clone();
        url.set_query(Some(&format!(
            "lctnScCode={}&schulCrseScCode={}&orgName={}&loginType=school",
            query.region.area_code_param(),
            query.level.code(),
            escape_query_value(&query.name),
        )));
        url
    }

    /// Identity submission URL on the region host.
    pub fn find_user(&self, region: Region) -> Option<&Url> {
        self.regions.get(&region).map(|endpoints| &endpoints.find_user)
    }

    /// User group selection URL on the region host.
    pub fn select_user_group(&self, region: Region) -> Option<&Url> {
        self.regions
            .get(&region)
            .map(|endpoints| &endpoints.select_user_group)
    }

    /// Final token URL on the region host.
    pub fn get_user_info(&self, region: Region) -> Option<&Url> {
        self.regions
            .get(&region)
            .map(|endpoints| &endpoints.get_user_info)
    }

    /// Survey registration URL on the region host.
    pub fn register_survey(&self, region: Region) -> Option<&Url> {
        self.regions
            .get(&region)
            .map(|endpoints| &endpoints.register_survey)
    }
}

fn region_endpoints(region: Region, template: &str) -> Result<RegionEndpoints, String> {
    let raw = template.replace(REGION_PLACEHOLDER, region.subdomain());
    let base = Url::parse(&raw).map_err(|error| format!("`{raw}`: {error}"))?;
    if base.cannot_be_a_base() {
        return Err(format!("`{raw}` cannot carry a path"));
    }
    Ok(RegionEndpoints {
        find_user: join(&base, FIND_USER_PATH)?,
        select_user_group: join(&base, SELECT_USER_GROUP_PATH)?,
        get_user_info: join(&base, GET_USER_INFO_PATH)?,
        register_survey: join(&base, REGISTER_SURVEY_PATH)?,
    })
}

fn escape_query_value(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

fn join(base: &Url, path: &str) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| "URL cannot carry a path".to_owned())?
        .pop_if_empty()
        .extend(path.split('/'));
    Ok(url)
}
