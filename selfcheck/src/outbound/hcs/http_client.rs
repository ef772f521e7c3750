//! Reqwest-backed HCS API adapter.
//!
//! This adapter owns transport details only: URL selection, headers, timeout
//! and HTTP error mapping, and JSON decoding into domain records. Ordering of
//! the session calls is the domain's concern.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::dto::{
    FindUserRequestDto, FindUserResponseDto, GetUserInfoRequestDto, RegisterSurveyDto,
    SearchSchoolResponseDto, UserGroupDto, UserInfoResponseDto,
};
use super::endpoints::HcsEndpoints;
use crate::domain::ports::{
    FindUserRequest, FoundUser, HcsClientError, SchoolCandidate, SchoolDirectory,
    SchoolSearchQuery, SessionGateway, SurveyGateway, UserGroup,
};
use crate::domain::{HealthSurvey, OrganizationCode, Region, SessionToken};

const DEFAULT_USER_AGENT: &str = concat!("selfcheck/", env!("CARGO_PKG_VERSION"));
const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// HCS adapter performing one HTTP request per port call.
pub struct HcsHttpClient {
    client: Client,
    endpoints: HcsEndpoints,
}

impl HcsHttpClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let client = HcsHttpClient::new(HcsEndpoints::production()?, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoints: HcsEndpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(endpoints, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter sending a custom user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        endpoints: HcsEndpoints,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .tcp_keepalive(TCP_KEEPALIVE)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, endpoints })
    }

    fn region_url(
        &self,
        region: Region,
        pick: fn(&HcsEndpoints, Region) -> Option<&Url>,
    ) -> Result<Url, HcsClientError> {
        pick(&self.endpoints, region)
            .cloned()
            .ok_or_else(|| HcsClientError::transport(format!("no host configured for {region}")))
    }

    fn authorised_post(
        &self,
        url: Url,
        token: &SessionToken,
    ) -> Result<RequestBuilder, HcsClientError> {
        Ok(self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization_value(token)?))
    }
}

#[async_trait]
impl SchoolDirectory for HcsHttpClient {
    async fn search_schools(
        &self,
        query: &SchoolSearchQuery,
    ) -> Result<Vec<SchoolCandidate>, HcsClientError> {
        let url = self.endpoints.search_school(query);
        debug!(region = %query.region, endpoint = "searchSchool", "issuing request");
        let body = send_expecting_success(self.client.get(url).header(ACCEPT, "application/json"))
            .await?;
        parse_school_candidates(&body)
    }
}

#[async_trait]
impl SessionGateway for HcsHttpClient {
    async fn find_user(
        &self,
        region: Region,
        request: &FindUserRequest,
    ) -> Result<FoundUser, HcsClientError> {
        let url = self.region_url(region, HcsEndpoints::find_user)?;
        debug!(region = %region, endpoint = "findUser", "issuing request");
        let body = send_expecting_success(
            self.client
                .post(url)
                .header(ACCEPT, "application/json")
                .json(&FindUserRequestDto::from(request)),
        )
        .await?;
        parse_found_user(&body)
    }

    async fn select_user_group(
        &self,
        region: Region,
        token: &SessionToken,
    ) -> Result<UserGroup, HcsClientError> {
        let url = self.region_url(region, HcsEndpoints::select_user_group)?;
        debug!(region = %region, endpoint = "selectUserGroup", "issuing request");
        let body = send_expecting_success(self.authorised_post(url, token)?).await?;
        parse_user_group(&body)
    }

    async fn get_user_info(
        &self,
        region: Region,
        token: &SessionToken,
        org_code: &OrganizationCode,
        user_pno: &str,
    ) -> Result<SessionToken, HcsClientError> {
        let url = self.region_url(region, HcsEndpoints::get_user_info)?;
        debug!(region = %region, endpoint = "getUserInfo", "issuing request");
        let payload = GetUserInfoRequestDto {
            org_code: org_code.as_str(),
            user_pno,
        };
        let body =
            send_expecting_success(self.authorised_post(url, token)?.json(&payload)).await?;
        parse_final_token(&body)
    }
}

#[async_trait]
impl SurveyGateway for HcsHttpClient {
    async fn register_survey(
        &self,
        region: Region,
        token: &SessionToken,
        survey: &HealthSurvey,
    ) -> Result<(), HcsClientError> {
        let url = self.region_url(region, HcsEndpoints::register_survey)?;
        debug!(region = %region, endpoint = "registerServey", "issuing request");
        let response = self
            .authorised_post(url, token)?
            .json(&RegisterSurveyDto::from(survey))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(region = %region, status = status.as_u16(), "survey registered");
        Ok(())
    }
}

async fn send_expecting_success(request: RequestBuilder) -> Result<Vec<u8>, HcsClientError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    debug!(status = status.as_u16(), bytes = body.len(), "response received");
    Ok(body.to_vec())
}

fn authorization_value(token: &SessionToken) -> Result<HeaderValue, HcsClientError> {
    let mut value = HeaderValue::from_str(token.expose()).map_err(|_| {
        HcsClientError::protocol("session token is not a valid header value")
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn parse_school_candidates(body: &[u8]) -> Result<Vec<SchoolCandidate>, HcsClientError> {
    decode_object_body::<SearchSchoolResponseDto>(body, "searchSchool")
        .map(SearchSchoolResponseDto::into_candidates)
}

fn parse_found_user(body: &[u8]) -> Result<FoundUser, HcsClientError> {
    decode_object_body::<FindUserResponseDto>(body, "findUser").map(FoundUser::from)
}

fn parse_user_group(body: &[u8]) -> Result<UserGroup, HcsClientError> {
    decode_body::<Vec<UserGroupDto>>(body, "selectUserGroup")?
        .into_iter()
        .next()
        .map(UserGroup::from)
        .ok_or_else(|| HcsClientError::protocol("selectUserGroup returned no user groups"))
}

fn parse_final_token(body: &[u8]) -> Result<SessionToken, HcsClientError> {
    decode_object_body::<UserInfoResponseDto>(body, "getUserInfo")
        .map(|dto| SessionToken::new(dto.token))
}

fn parse_json(body: &[u8], endpoint: &str) -> Result<Value, HcsClientError> {
    serde_json::from_slice(body).map_err(|error| {
        HcsClientError::decode(format!("{endpoint} answered with invalid JSON: {error}"))
    })
}

fn from_json_value<T: DeserializeOwned>(value: Value, endpoint: &str) -> Result<T, HcsClientError> {
    serde_json::from_value(value).map_err(|error| {
        HcsClientError::protocol(format!("{endpoint} answered with an unexpected shape: {error}"))
    })
}

fn decode_body<T: DeserializeOwned>(body: &[u8], endpoint: &str) -> Result<T, HcsClientError> {
    from_json_value(parse_json(body, endpoint)?, endpoint)
}

/// Like [`decode_body`], but only a JSON object is accepted.
///
/// Derived struct deserializers also take a sequence, which would let `[]`
/// pass as an object whose fields are all defaulted.
fn decode_object_body<T: DeserializeOwned>(
    body: &[u8],
    endpoint: &str,
) -> Result<T, HcsClientError> {
    let value = parse_json(body, endpoint)?;
    if !value.is_object() {
        return Err(HcsClientError::protocol(format!(
            "{endpoint} answered with {} instead of an object",
            json_type_name(&value)
        )));
    }
    from_json_value(value, endpoint)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn map_transport_error(error: reqwest::Error) -> HcsClientError {
    // Error text carries the URL, never headers.
    if error.is_timeout() {
        HcsClientError::timeout(error.to_string())
    } else {
        HcsClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> HcsClientError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    HcsClientError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
