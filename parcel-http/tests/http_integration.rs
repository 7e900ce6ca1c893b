//! Exercises the HTTP clients against a one-shot local server.

use parcel_core::api::KpiRequest;
use parcel_core::lead_form::{LeadForm, LeadFormSubmitter, SubmissionOutcome};
use parcel_core::{ApiConfig, ApiError, MaritimeApi, Session};
use parcel_http::{HttpLeadFormSubmitter, HttpMaritimeApi};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request text.
async fn serve_once(
    status: &str,
    body: &str,
) -> (String, JoinHandle<String>) {
    serve_raw(format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ))
    .await
}

/// Writes `response` verbatim, including malformed ones.
async fn serve_raw(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn api(
    base_url: String,
    session: Session,
) -> HttpMaritimeApi {
    let config = ApiConfig {
        base_url,
        ..Default::default()
    };
    HttpMaritimeApi::new(config, session).unwrap()
}

#[tokio::test]
async fn get_ports_sends_bearer_token_and_decodes_list() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"ports":[{"id":"7","name":"Santos","country":"Brazil","region":"South America","coordinates":{"lat":-23.9,"lng":-46.3},"corruptionIndex":38}]}"#,
    )
    .await;

    let ports = api(base_url, Session::with_token("abc123"))
        .get_ports()
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/ports HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer abc123"));
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].name, "Santos");
    assert_eq!(ports[0].corruption_index, Some(38.0));
}

#[tokio::test]
async fn kpi_request_posts_json_and_accepts_null() {
    let (base_url, server) = serve_once("200 OK", "null").await;

    let kpis = api(base_url, Session::new())
        .calculate_kpis(&KpiRequest::default())
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(kpis, None);
    assert!(request.starts_with("POST /api/kpis/calculate HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with("{}"));
}

#[tokio::test]
async fn unauthorized_reply_clears_session_and_sets_redirect() {
    let (base_url, server) = serve_once("401 Unauthorized", r#"{"detail":"expired"}"#).await;
    let session = Session::with_token("stale");

    let result = api(base_url, session.clone()).get_vessels().await;
    server.await.unwrap();

    assert_eq!(
        result,
        Err(ApiError::Unauthorized {
            login_route: "/login".to_string()
        })
    );
    assert_eq!(session.token(), None);
    assert_eq!(session.take_redirect().as_deref(), Some("/login"));
}

#[tokio::test]
async fn server_error_carries_detail() {
    let (base_url, server) =
        serve_once("500 Internal Server Error", r#"{"detail":"model offline"}"#).await;

    let result = api(base_url, Session::new()).health_check().await;
    server.await.unwrap();

    assert_eq!(
        result,
        Err(ApiError::Status {
            status: 500,
            message: "model offline".to_string()
        })
    );
}

#[tokio::test]
async fn lead_form_posts_payload_with_consent() {
    let (base_url, server) = serve_once("200 OK", r#"{"result":"success"}"#).await;
    let submitter = HttpLeadFormSubmitter::new(format!("{base_url}/exec"));
    let mut form = LeadForm::new();
    form.set_field("Email", "ops@example.com");
    form.set_consent(true);

    let outcome = submitter.submit(&form).await;
    let request = server.await.unwrap();

    assert_eq!(outcome, SubmissionOutcome::Success);
    assert!(request.starts_with("POST /exec HTTP/1.1"));
    assert!(request.contains(r#""Email":"ops@example.com""#));
    assert!(request.contains(r#""Consent":"Yes""#));
}

#[tokio::test]
async fn lead_form_error_reply_is_application_error() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"result":"error","error":"Sheet locked"}"#).await;
    let submitter = HttpLeadFormSubmitter::new(base_url);

    let outcome = submitter.submit(&LeadForm::new()).await;
    server.await.unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::ApplicationError("Sheet locked".to_string())
    );
}

#[tokio::test]
async fn lead_form_reply_cut_short_is_still_accepted() {
    // Announces more body than is sent, so reading the reply fails.
    let (base_url, server) = serve_raw(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\nConnection: close\r\n\r\n{\"result\"".to_string(),
    )
    .await;
    let submitter = HttpLeadFormSubmitter::new(format!("{base_url}/exec"));
    let mut form = LeadForm::new();
    form.set_field("Email", "ops@example.com");

    let outcome = submitter.submit(&form).await;

    server.await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::Success);
}
