//! ReqwestTransport against a local mock server

use std::sync::Arc;
use std::time::Duration;

use docsentry_client::{
    attach_credential, ApiClient, ApiRequest, ApiResponse, ClientError, FormPart, Interceptor,
    ReqwestTransport, StatusCode, Transport,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Token;

impl Interceptor for Token {
    fn on_request(&self, request: ApiRequest) -> ApiRequest {
        attach_credential(request, Some("tok1"))
    }
}

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_json_post_hits_prefixed_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "name": "A"},
            "token": "tok1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(Arc::new(transport_for(&server)));
    let body: serde_json::Value = client
        .post_json("/auth/login", &json!({"email": "a@b.com", "password": "x"}))
        .await
        .unwrap();

    assert_eq!(body["token"], "tok1");
}

#[tokio::test]
async fn test_bearer_header_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(Arc::new(transport_for(&server))).with_interceptor(Arc::new(Token));
    let body: serde_json::Value = client.get_json("/documents").await.unwrap();
    assert!(body["documents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "expired"}})),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let response: ApiResponse = transport.execute(&ApiRequest::get("/auth/me")).await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let client = ApiClient::new(Arc::new(transport));
    let err = client.get_bytes("/auth/me").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(err.server_message(), Some("expired"));
}

#[tokio::test]
async fn test_multipart_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/analyze"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"document": {"id": "d1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(Arc::new(transport_for(&server)));
    let parts = vec![
        FormPart::file("document", "policy.txt", "text/plain", b"hello".to_vec()),
        FormPart::text("llmProvider", "claude"),
        FormPart::text("analysisType", "full"),
    ];
    let body: serde_json::Value = client
        .post_multipart("/documents/analyze", parts)
        .await
        .unwrap();
    assert_eq!(body["document"]["id"], "d1");

    let received = server.received_requests().await.unwrap();
    let content_type = received[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let raw = String::from_utf8_lossy(&received[0].body);
    assert!(raw.contains("name=\"llmProvider\""));
    assert!(raw.contains("filename=\"policy.txt\""));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let transport = ReqwestTransport::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
    let err = transport
        .execute(&ApiRequest::get("/documents"))
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/4/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 64]))
        .mount(&server)
        .await;

    let request = ApiRequest::get("/documents/4/download");

    let capped = transport_for(&server).with_max_body_bytes(16);
    let err = capped.execute(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::ResponseTooLarge { limit: 16 }));

    let roomy = transport_for(&server).with_max_body_bytes(64);
    let response = roomy.execute(&request).await.unwrap();
    assert_eq!(response.body.len(), 64);
}
