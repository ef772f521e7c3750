//! The reqwest HCS adapter against a scripted local HTTP server.
//!
//! The server answers each connection with the next scripted response and
//! records what the adapter sent, so status handling, headers and body
//! decoding are checked over a real socket.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rstest::rstest;
use selfcheck::domain::ports::{
    FindUserRequest, HcsClientError, SchoolDirectory, SchoolSearchQuery, SessionGateway,
    SurveyGateway,
};
use selfcheck::domain::{
    EducationLevel, EncryptedField, ErrorKind, HealthSurvey, OrganizationCode, Region,
    SessionToken, StudentSession,
};
use selfcheck::outbound::hcs::{HcsEndpoints, HcsHttpClient};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

struct ScriptedServer {
    base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl ScriptedServer {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            let mut script = VecDeque::from(responses);
            while let Some((status, body)) = script.pop_front() {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                if serve_one(stream, status, body, &recorded).await.is_err() {
                    return;
                }
            }
        });
        Self {
            base,
            requests,
            task,
        }
    }

    fn client(&self) -> HcsHttpClient {
        let endpoints = HcsEndpoints::new(&self.base, &format!("{}/{{region}}", self.base))
            .expect("local endpoints");
        HcsHttpClient::new(endpoints, Duration::from_secs(5)).expect("client builds")
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests mutex").clone()
    }

    fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "{requests:?}");
        requests[0].clone()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Read one request, record it, then send the scripted response.
async fn serve_one(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_owned();
    let target = request_line.next().unwrap_or_default().to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_owned()))
        .collect();
    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    while buffer.len() < header_end + length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let end = buffer.len().min(header_end + length);
    recorded
        .lock()
        .expect("requests mutex")
        .push(RecordedRequest {
            method,
            target,
            headers,
            body: String::from_utf8_lossy(&buffer[header_end..end]).into_owned(),
        });

    let response = format!(
        "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn session() -> StudentSession {
    StudentSession::new(
        Some("Test High School".to_owned()),
        "ENCRYPTED-NAME",
        SessionToken::new("final-token"),
        Region::Gyeongbuk,
        "20050101",
    )
}

fn find_user_request() -> FindUserRequest {
    FindUserRequest {
        name: EncryptedField::new("NAME-CIPHER"),
        birthday: EncryptedField::new("BIRTH-CIPHER"),
        org_code: OrganizationCode::new("S000003456"),
    }
}

#[tokio::test]
async fn accepted_survey_is_posted_with_token_and_json_body() {
    let server = ScriptedServer::start(vec![(200, r#"{"registerDtm":"now"}"#)]).await;
    let session = session();

    server
        .client()
        .register_survey(
            Region::Gyeongbuk,
            session.token(),
            &HealthSurvey::all_healthy(&session),
        )
        .await
        .expect("200 is accepted");

    let request = server.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/gbe/registerServey");
    assert_eq!(request.header("authorization"), Some("final-token"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("accept"), Some("application/json"));
    let body = request.json();
    assert_eq!(body["deviceUuid"], "");
    assert_eq!(body["rspns00"], "Y");
    assert_eq!(body["rspns03"], Value::Null);
    assert_eq!(body["upperToken"], "final-token");
    assert_eq!(body["upperUserNameEncpt"], "ENCRYPTED-NAME");
}

#[rstest]
#[case::created(201)]
#[case::accepted(202)]
#[case::server_error(500)]
#[tokio::test]
async fn survey_status_other_than_200_is_a_status_error(#[case] status: u16) {
    let server = ScriptedServer::start(vec![(status, r#"{"message":"nope"}"#)]).await;
    let session = session();

    let error = server
        .client()
        .register_survey(
            Region::Gyeongbuk,
            session.token(),
            &HealthSurvey::all_healthy(&session),
        )
        .await
        .expect_err("only 200 counts as accepted");

    match error {
        HcsClientError::Status { status: code, .. } => assert_eq!(code, status),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn find_user_posts_identity_without_authorization() {
    let server = ScriptedServer::start(vec![(
        200,
        r#"{"orgName":"Test High School","userNameEncpt":"SERVER-NAME","token":"initial"}"#,
    )])
    .await;

    let found = server
        .client()
        .find_user(Region::Gyeongbuk, &find_user_request())
        .await
        .expect("valid identity response");

    assert_eq!(found.token.expose(), "initial");
    assert_eq!(found.user_name.as_deref(), Some("SERVER-NAME"));
    let request = server.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/gbe/v2/findUser");
    assert_eq!(request.header("authorization"), None);
    assert_eq!(request.header("content-type"), Some("application/json"));
    let body = request.json();
    assert_eq!(body["name"], "NAME-CIPHER");
    assert_eq!(body["birthday"], "BIRTH-CIPHER");
    assert_eq!(body["orgCode"], "S000003456");
    assert_eq!(body["loginType"], "school");
}

#[rstest]
#[case::maintenance_page(200, "<html>maintenance</html>", ErrorKind::Decode)]
#[case::array_instead_of_object(200, "[]", ErrorKind::Protocol)]
#[case::missing_token(200, r#"{"orgName":"A"}"#, ErrorKind::Protocol)]
#[case::unauthorised(401, r#"{"message":"denied"}"#, ErrorKind::Status)]
#[tokio::test]
async fn find_user_failures_are_classified(
    #[case] status: u16,
    #[case] body: &'static str,
    #[case] expected: ErrorKind,
) {
    let server = ScriptedServer::start(vec![(status, body)]).await;

    let error = server
        .client()
        .find_user(Region::Gyeongbuk, &find_user_request())
        .await
        .expect_err("must fail");

    assert_eq!(error.kind(), expected, "{error}");
}

#[tokio::test]
async fn select_user_group_object_is_a_protocol_error() {
    let server = ScriptedServer::start(vec![(200, r#"{"userPNo":"1","token":"a"}"#)]).await;

    let error = server
        .client()
        .select_user_group(Region::Gyeongbuk, &SessionToken::new("initial"))
        .await
        .expect_err("an object is not a user group list");

    assert_eq!(error.kind(), ErrorKind::Protocol);
    let request = server.only_request();
    assert_eq!(request.target, "/gbe/v2/selectUserGroup");
    assert_eq!(request.header("authorization"), Some("initial"));
}

#[tokio::test]
async fn get_user_info_sends_org_code_and_user_number() {
    let server = ScriptedServer::start(vec![(200, r#"{"token":"final"}"#)]).await;

    let token = server
        .client()
        .get_user_info(
            Region::Gyeongbuk,
            &SessionToken::new("intermediate"),
            &OrganizationCode::new("S000003456"),
            "1234567",
        )
        .await
        .expect("valid token response");

    assert_eq!(token.expose(), "final");
    let request = server.only_request();
    assert_eq!(request.target, "/gbe/v2/getUserInfo");
    assert_eq!(request.header("authorization"), Some("intermediate"));
    let body = request.json();
    assert_eq!(body["orgCode"], "S000003456");
    assert_eq!(body["userPNo"], "1234567");
}

#[tokio::test]
async fn school_search_is_a_get_with_the_query_string() {
    let server = ScriptedServer::start(vec![(
        200,
        r#"{"schulList":[{"orgCode":"S000003456"},{"orgCode":"S000009999"}]}"#,
    )])
    .await;

    let candidates = server
        .client()
        .search_schools(&SchoolSearchQuery {
            name: "Test High School".to_owned(),
            region: Region::Seoul,
            level: EducationLevel::High,
        })
        .await
        .expect("valid search response");

    let codes: Vec<_> = candidates.iter().map(|c| c.org_code.as_str()).collect();
    assert_eq!(codes, ["S000003456", "S000009999"]);
    let request = server.only_request();
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.target,
        "/v2/searchSchool?lctnScCode=01&schulCrseScCode=4&orgName=Test+High+School&loginType=school"
    );
    assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn school_search_array_body_is_a_protocol_error() {
    let server = ScriptedServer::start(vec![(200, "[]")]).await;

    let error = server
        .client()
        .search_schools(&SchoolSearchQuery {
            name: "Test High School".to_owned(),
            region: Region::Seoul,
            level: EducationLevel::High,
        })
        .await
        .expect_err("an array is not a search response");

    assert_eq!(error.kind(), ErrorKind::Protocol);
}
