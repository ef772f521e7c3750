//! End-to-end self-check flow over scripted HCS stubs.
//!
//! The stubs record every call so the tests can assert the exact request
//! sequence the runner issues per student.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;
use selfcheck::domain::ports::{
    FindUserRequest, FoundUser, HcsClientError, IdentityEncoder, IdentityEncoderError,
    SchoolCandidate, SchoolDirectory, SchoolSearchQuery, SessionGateway, SubmissionLog,
    SurveyGateway, UserGroup,
};
use selfcheck::domain::{
    EducationLevel, EncryptedField, HealthSurvey, OrganizationCode, Region, SelfCheckConfig,
    BatchRecord, SelfCheckPorts, SelfCheckRunner, SessionToken, StudentIdentity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Search(String),
    FindUser(String),
    SelectUserGroup(String),
    GetUserInfo(String, String),
    RegisterSurvey(String, String),
}

#[derive(Default)]
struct ScriptedHcs {
    calls: Mutex<Vec<Call>>,
    known_schools: Vec<&'static str>,
    survey_status: Option<u16>,
}

impl ScriptedHcs {
    fn healthy() -> Self {
        Self {
            known_schools: vec!["Test High School"],
            ..Self::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls mutex").push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls mutex").clone()
    }
}

#[async_trait]
impl SchoolDirectory for ScriptedHcs {
    async fn search_schools(
        &self,
        query: &SchoolSearchQuery,
    ) -> Result<Vec<SchoolCandidate>, HcsClientError> {
        self.record(Call::Search(query.name.clone()));
        if self.known_schools.contains(&query.name.as_str()) {
            Ok(vec![
                SchoolCandidate {
                    org_code: OrganizationCode::new("S000003456"),
                },
                SchoolCandidate {
                    org_code: OrganizationCode::new("S999999999"),
                },
            ])
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl SessionGateway for ScriptedHcs {
    async fn find_user(
        &self,
        _region: Region,
        request: &FindUserRequest,
    ) -> Result<FoundUser, HcsClientError> {
        self.record(Call::FindUser(request.org_code.as_str().to_owned()));
        Ok(FoundUser {
            organization_name: Some("Test High School".to_owned()),
            user_name: None,
            token: SessionToken::new("initial"),
        })
    }

    async fn select_user_group(
        &self,
        _region: Region,
        token: &SessionToken,
    ) -> Result<UserGroup, HcsClientError> {
        self.record(Call::SelectUserGroup(token.expose().to_owned()));
        Ok(UserGroup {
            user_pno: "1234567".to_owned(),
            token: SessionToken::new("intermediate"),
        })
    }

    async fn get_user_info(
        &self,
        _region: Region,
        token: &SessionToken,
        _org_code: &OrganizationCode,
        user_pno: &str,
    ) -> Result<SessionToken, HcsClientError> {
        self.record(Call::GetUserInfo(
            token.expose().to_owned(),
            user_pno.to_owned(),
        ));
        Ok(SessionToken::new("final"))
    }
}

#[async_trait]
impl SurveyGateway for ScriptedHcs {
    async fn register_survey(
        &self,
        _region: Region,
        token: &SessionToken,
        survey: &HealthSurvey,
    ) -> Result<(), HcsClientError> {
        self.record(Call::RegisterSurvey(
            token.expose().to_owned(),
            survey.upper_user_name().to_owned(),
        ));
        match self.survey_status {
            None | Some(200) => Ok(()),
            Some(status) => Err(HcsClientError::status(status, format!("status {status}"))),
        }
    }
}

struct TaggingEncoder;

impl IdentityEncoder for TaggingEncoder {
    fn encrypt(&self, plaintext: &str) -> Result<EncryptedField, IdentityEncoderError> {
        Ok(EncryptedField::new(format!("cipher:{}", plaintext.len())))
    }
}

#[derive(Default)]
struct MemoryLog(Mutex<Vec<String>>);

impl MemoryLog {
    fn outcomes(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("log mutex")
            .iter()
            .filter(|line| line.contains("[success]") || line.contains("[failure]"))
            .cloned()
            .collect()
    }
}

impl SubmissionLog for MemoryLog {
    fn info(&self, text: &str) {
        self.0.lock().expect("log mutex").push(format!("(info) {text}"));
    }

    fn error(&self, text: &str) {
        self.0.lock().expect("log mutex").push(format!("(error) {text}"));
    }
}

fn runner(hcs: Arc<ScriptedHcs>, log: Arc<MemoryLog>) -> SelfCheckRunner {
    let ports = SelfCheckPorts::new(Arc::new(TaggingEncoder), hcs.clone(), hcs.clone(), hcs, log);
    SelfCheckRunner::new(ports, SelfCheckConfig {
        region: Region::Gyeongbuk,
        level: EducationLevel::High,
        max_delay: Duration::ZERO,
    })
}

fn student(school: &str) -> BatchRecord {
    StudentIdentity::new(school, "Hong Gildong", "20050101").into()
}

#[tokio::test]
async fn happy_path_issues_exactly_five_calls_in_order() {
    let hcs = Arc::new(ScriptedHcs::healthy());
    let log = Arc::new(MemoryLog::default());

    let summary = runner(hcs.clone(), log.clone())
        .run(&[student("Test High School")])
        .await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(hcs.calls(), [
        Call::Search("Test High School".to_owned()),
        Call::FindUser("S000003456".to_owned()),
        Call::SelectUserGroup("initial".to_owned()),
        Call::GetUserInfo("intermediate".to_owned(), "1234567".to_owned()),
        Call::RegisterSurvey("final".to_owned(), "cipher:12".to_owned()),
    ]);
    assert_eq!(log.outcomes(), [
        "(info) Hong Gildong: self-check submission [success]".to_owned()
    ]);
}

#[tokio::test]
async fn unknown_school_stops_after_the_search() {
    let hcs = Arc::new(ScriptedHcs::healthy());
    let log = Arc::new(MemoryLog::default());

    let summary = runner(hcs.clone(), log.clone())
        .run(&[student("Nowhere School"), student("Test High School")])
        .await;

    assert_eq!((summary.succeeded, summary.failed), (1, 1));
    assert_eq!(hcs.calls().len(), 1 + 5);
    let outcomes = log.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].starts_with("(error) Hong Gildong: student lookup [failure] (not_found)"));
}

#[rstest]
#[case::server_error(500)]
#[case::created(201)]
#[tokio::test]
async fn survey_status_errors_fail_only_the_submission(#[case] status: u16) {
    let hcs = Arc::new(ScriptedHcs {
        survey_status: Some(status),
        ..ScriptedHcs::healthy()
    });
    let log = Arc::new(MemoryLog::default());

    let summary = runner(hcs.clone(), log.clone())
        .run(&[student("Test High School")])
        .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(hcs.calls().len(), 5);
    let outcomes = log.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].contains("self-check submission [failure] (status)"));
}

#[tokio::test]
async fn invalid_roster_record_does_not_stop_the_others() {
    let roster = roster::Roster::from_json(
        r#"[
            {"school": "Test High School", "name": "First", "birth": "20050101"},
            {"school": "Test High School", "name": "Second", "birth": "2005-02-02"},
            {"school": "Test High School", "name": "Third", "birth": "050303"}
        ]"#,
    )
    .expect("roster parses");
    let records: Vec<BatchRecord> = roster.into_records().into_iter().map(Into::into).collect();
    let hcs = Arc::new(ScriptedHcs::healthy());
    let log = Arc::new(MemoryLog::default());

    let summary = runner(hcs.clone(), log.clone()).run(&records).await;

    assert_eq!((summary.succeeded, summary.failed), (2, 1));
    assert_eq!(hcs.calls().len(), 2 * 5);
    let outcomes = log.outcomes();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0], "(info) First: self-check submission [success]");
    assert!(
        outcomes[1].starts_with("(error) Second: roster entry [failure] (invalid_record)"),
        "{}",
        outcomes[1]
    );
    assert_eq!(outcomes[2], "(info) Third: self-check submission [success]");
}

#[tokio::test]
async fn empty_roster_only_writes_the_frame() {
    let hcs = Arc::new(ScriptedHcs::healthy());
    let log = Arc::new(MemoryLog::default());

    let roster = roster::Roster::from_json("[]").expect("empty roster parses");
    let records: Vec<BatchRecord> = roster.into_records().into_iter().map(Into::into).collect();

    let summary = runner(hcs.clone(), log.clone()).run(&records).await;

    assert_eq!(summary.total(), 0);
    assert!(hcs.calls().is_empty());
    assert!(log.outcomes().is_empty());
}
