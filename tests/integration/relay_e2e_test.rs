//! End-to-end tests: chat session -> HTTP relay client -> relay server -> stubbed inference API
//!
//! The relay runs on an ephemeral port with its Hugging Face client pointed at
//! a wiremock server, so no real credential or network access is needed.

use std::net::SocketAddr;
use std::sync::Arc;

use relaychat_conversations::{
    ChatSession, ClientError, HttpRelayClient, MessageRole, RelayClient, Settlement,
    CONNECTION_BANNER, ERROR_APOLOGY,
};
use relaychat_llm::{huggingface::HuggingFaceService, LlmConfig, DEFAULT_MODEL};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "hf_test_key"; // pragma: allowlist secret

/// Relay listening on a local port, backed by a stubbed inference API
struct TestRelay {
    addr: SocketAddr,
    upstream: MockServer,
}

impl TestRelay {
    async fn start() -> Self {
        let upstream = MockServer::start().await;
        let config = LlmConfig::huggingface(TEST_KEY).with_base_url(upstream.uri());
        let llm = HuggingFaceService::new(config).expect("credential is set");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = relaychat_app::build_app(Arc::new(llm));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, upstream }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn client(&self) -> HttpRelayClient {
        HttpRelayClient::new(&self.base_url())
    }

    async fn stub_inference(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}", DEFAULT_MODEL)))
            .respond_with(response)
            .mount(&self.upstream)
            .await;
    }
}

async fn send(session: &mut ChatSession, client: &dyn RelayClient, text: &str) -> Settlement {
    assert!(session.set_input(text));
    session.submit(client).await.expect("submit accepted")
}

#[test_log::test(tokio::test)]
async fn test_reply_reaches_conversation_with_wrapped_prompt() {
    let relay = TestRelay::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{}", DEFAULT_MODEL)))
        .and(header("authorization", format!("Bearer {}", TEST_KEY).as_str()))
        .and(body_json(json!({ "inputs": "<s>[INST] Hello there [/INST]" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "General Kenobi" }])),
        )
        .expect(1)
        .mount(&relay.upstream)
        .await;

    let mut session = ChatSession::new();
    let settlement = send(&mut session, &relay.client(), "Hello there").await;

    assert_eq!(settlement, Settlement::Appended(MessageRole::Assistant));
    let roles: Vec<_> = session.conversation().iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    assert_eq!(session.conversation().iter().next().unwrap().text(), "Hello there");
    assert_eq!(session.conversation().last().unwrap().text(), "General Kenobi");
    assert!(!session.has_error());
    assert!(!session.is_awaiting());
}

#[test_log::test(tokio::test)]
async fn test_missing_generated_text_becomes_placeholder() {
    let relay = TestRelay::start().await;
    relay
        .stub_inference(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .await;

    let mut session = ChatSession::new();
    send(&mut session, &relay.client(), "hi").await;

    assert_eq!(session.conversation().last().unwrap().text(), "No response");
    assert!(!session.has_error());
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_surfaces_as_apology() {
    let relay = TestRelay::start().await;
    relay
        .stub_inference(
            ResponseTemplate::new(503).set_body_json(json!({ "error": "Model is loading" })),
        )
        .await;

    // The relay hides the upstream detail behind a generic 500
    let err = relay.client().send("hi").await.unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(
                body,
                json!({ "error": "Failed to get response from Hugging Face API" })
            );
        }
        other => panic!("Expected status error, got {:?}", other),
    }

    let mut session = ChatSession::new();
    let settlement = send(&mut session, &relay.client(), "hi").await;

    assert_eq!(settlement, Settlement::Appended(MessageRole::Error));
    assert_eq!(session.conversation().last().unwrap().text(), ERROR_APOLOGY);
    assert_eq!(session.error_banner(), Some(CONNECTION_BANNER));

    // Clearing resets the banner
    session.clear();
    assert!(session.error_banner().is_none());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_relay_is_a_request_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpRelayClient::new(&format!("http://{}", addr));
    let err = client.send("anyone there?").await.unwrap_err();
    assert!(
        matches!(err, ClientError::Request(_)),
        "Expected request error, got {:?}",
        err
    );

    let mut session = ChatSession::new();
    let settlement = send(&mut session, &client, "anyone there?").await;

    assert_eq!(settlement, Settlement::Appended(MessageRole::Error));
    assert!(session.has_error());
}

#[test_log::test(tokio::test)]
async fn test_raw_http_contract() {
    let relay = TestRelay::start().await;
    relay
        .stub_inference(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "pong" }])),
        )
        .await;
    let http = reqwest::Client::new();

    // Legacy path answers the same way, with CORS headers for browsers
    let response = http
        .post(format!("{}/api/chat", relay.base_url()))
        .header("origin", "http://localhost:3000")
        .json(&json!({ "message": "ping" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "reply": "pong" }));

    // Non-JSON body is rejected before any upstream call
    let response = http
        .post(format!("{}/chat", relay.base_url()))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let upstream_calls = relay.upstream.received_requests().await.unwrap();
    assert_eq!(upstream_calls.len(), 1);
}
