//! Wire DTOs for the HCS JSON API.
//!
//! Response bodies are parsed into `serde_json::Value` first and only then
//! into these DTOs, so a body that is not JSON at all and JSON of the wrong
//! shape are reported differently.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{FindUserRequest, FoundUser, SchoolCandidate, UserGroup};
use crate::domain::{HealthSurvey, OrganizationCode, SessionToken};

#[derive(Debug, Deserialize)]
pub(super) struct SearchSchoolResponseDto {
    #[serde(rename = "schulList", default)]
    pub(super) schul_list: Vec<SchoolDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SchoolDto {
    #[serde(rename = "orgCode")]
    pub(super) org_code: String,
}

impl SearchSchoolResponseDto {
    pub(super) fn into_candidates(self) -> Vec<SchoolCandidate> {
        self.schul_list
            .into_iter()
            .map(|school| SchoolCandidate {
                org_code: OrganizationCode::new(school.org_code),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FindUserRequestDto<'a> {
    name: &'a str,
    birthday: &'a str,
    org_code: &'a str,
    login_type: &'static str,
}

impl<'a> From<&'a FindUserRequest> for FindUserRequestDto<'a> {
    fn from(request: &'a FindUserRequest) -> Self {
        Self {
            name: request.name.as_str(),
            birthday: request.birthday.as_str(),
            org_code: request.org_code.as_str(),
            login_type: "school",
        }
    }
}

/// `findUser` answer. Servers have used several spellings for the school
/// and user name fields, so each is read separately and the first present
/// one wins.
#[derive(Debug, Deserialize)]
pub(super) struct FindUserResponseDto {
    #[serde(rename = "orgName", default)]
    org_name: Option<String>,
    #[serde(rename = "orgname", default)]
    org_name_lower: Option<String>,
    #[serde(rename = "userNameEncpt", default)]
    user_name_encpt: Option<String>,
    #[serde(rename = "userName", default)]
    user_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    token: String,
}

impl From<FindUserResponseDto> for FoundUser {
    fn from(dto: FindUserResponseDto) -> Self {
        Self {
            organization_name: dto.org_name.or(dto.org_name_lower),
            user_name: dto.user_name_encpt.or(dto.user_name).or(dto.name),
            token: SessionToken::new(dto.token),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserGroupDto {
    #[serde(rename = "userPNo")]
    user_pno: String,
    token: String,
}

impl From<UserGroupDto> for UserGroup {
    fn from(dto: UserGroupDto) -> Self {
        Self {
            user_pno: dto.user_pno,
            token: SessionToken::new(dto.token),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct GetUserInfoRequestDto<'a> {
    #[serde(rename = "orgCode")]
    pub(super) org_code: &'a str,
    #[serde(rename = "userPNo")]
    pub(super) user_pno: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserInfoResponseDto {
    pub(super) token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterSurveyDto<'a> {
    device_uuid: &'static str,
    rspns00: Option<&'static str>,
    rspns01: Option<&'static str>,
    rspns02: Option<&'static str>,
    rspns03: Option<&'static str>,
    rspns04: Option<&'static str>,
    rspns05: Option<&'static str>,
    rspns06: Option<&'static str>,
    rspns07: Option<&'static str>,
    rspns08: Option<&'static str>,
    rspns09: Option<&'static str>,
    rspns10: Option<&'static str>,
    rspns11: Option<&'static str>,
    rspns12: Option<&'static str>,
    rspns13: Option<&'static str>,
    rspns14: Option<&'static str>,
    rspns15: Option<&'static str>,
    upper_token: &'a str,
    upper_user_name_encpt: &'a str,
}

impl<'a> From<&'a HealthSurvey> for RegisterSurveyDto<'a> {
    fn from(survey: &'a HealthSurvey) -> Self {
        let [
            rspns00,
            rspns01,
            rspns02,
            rspns03,
            rspns04,
            rspns05,
            rspns06,
            rspns07,
            rspns08,
            rspns09,
            rspns10,
            rspns11,
            rspns12,
            rspns13,
            rspns14,
            rspns15,
        ] = *survey.answers();
        Self {
            device_uuid: "",
            rspns00,
            rspns01,
            rspns02,
            rspns03,
            rspns04,
            rspns05,
            rspns06,
            rspns07,
            rspns08,
            rspns09,
            rspns10,
            rspns11,
            rspns12,
            rspns13,
            rspns14,
            rspns15,
            upper_token: survey.upper_token().expose(),
            upper_user_name_encpt: survey.upper_user_name(),
        }
    }
}
