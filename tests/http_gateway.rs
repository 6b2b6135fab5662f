//! End-to-end tests for the reqwest transport against a local mock server.

use serde_json::{json, Value};
use veridu_client::{ApiConfig, Credentials, Method, Params, VeriduClient, VeriduError};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client_for(server: &MockServer) -> VeriduClient {
    let config = ApiConfig::default().with_base_url(server.uri());
    VeriduClient::with_config(Credentials::new("test-key", "test-secret"), config).unwrap()
}

/// Echoes the nonce found in the query string or form body.
struct EchoNonce(Value);

impl Respond for EchoNonce {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body).to_string();
        let query = request.url.query().unwrap_or_default().to_string();

        let nonce = [body, query].iter().find_map(|s| {
            s.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == "nonce")
                .map(|(_, v)| v.to_string())
        });

        let mut payload = self.0.clone();
        if let Some(nonce) = nonce {
            payload["nonce"] = json!(nonce);
        }
        ResponseTemplate::new(200).set_body_string(payload.to_string())
    }
}

#[tokio::test]
async fn test_get_sends_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/0.3/user/details"))
        .and(query_param("fields", "name"))
        .and(header("Veridu-Client", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": true, "name": "Ada"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut data = Params::new();
    data.insert("fields".into(), "name".into());

    let result = client.fetch(Method::Get, "user/details", Some(data)).await.unwrap();
    assert_eq!(result["name"], json!("Ada"));
}

#[tokio::test]
async fn test_post_sends_form_body_with_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0.3/profile"))
        .and(header("Veridu-Session", "abc"))
        .and(body_string_contains("type=facebook"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_session("abc");
    let mut data = Params::new();
    data.insert("type".into(), "facebook".into());

    assert!(client.fetch(Method::Post, "profile", Some(data)).await.is_ok());
}

#[tokio::test]
async fn test_delete_sends_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/0.3/session"))
        .and(body_string_contains("reason=logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut data = Params::new();
    data.insert("reason".into(), "logout".into());

    assert!(client.fetch(Method::Delete, "session", Some(data)).await.is_ok());
}

#[tokio::test]
async fn test_signed_post_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0.3/session/limited"))
        .and(body_string_contains("hash=sha1"))
        .and(body_string_contains("client=test-key"))
        .and(body_string_contains("signature="))
        .respond_with(EchoNonce(json!({"status": true, "token": "t-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let result = client
        .signed_fetch(Method::Post, "session/limited", None)
        .await
        .unwrap();

    assert_eq!(result["token"], json!("t-1"));
    assert!(!result.contains_key("nonce"));
}

#[tokio::test]
async fn test_signed_get_puts_signature_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/0.3/user"))
        .and(query_param("method", "GET"))
        .respond_with(EchoNonce(json!({"status": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    assert!(client.signed_fetch(Method::Get, "user", None).await.is_ok());
}

#[tokio::test]
async fn test_stale_nonce_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": true, "nonce": "1234567890"}"#),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let result = client.signed_fetch(Method::Put, "profile", None).await;
    assert!(matches!(result, Err(VeriduError::NonceMismatch)));
}

#[tokio::test]
async fn test_error_envelope_on_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"status": false, "error": {"type": "INVALID_SESSION", "message": "Session expired"}}"#,
        ))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.fetch(Method::Get, "user", None).await.unwrap_err();

    assert_eq!(err.to_string(), "Session expired");
    assert_eq!(client.last_error(), Some("INVALID_SESSION"));
}

#[tokio::test]
async fn test_html_error_page_is_invalid_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<h1>Bad Gateway</h1>"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    match client.fetch(Method::Get, "user", None).await {
        Err(VeriduError::InvalidFormat(raw)) => assert_eq!(raw, "<h1>Bad Gateway</h1>"),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}
