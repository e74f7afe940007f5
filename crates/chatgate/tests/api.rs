use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatgate::llm::{ChatService, Provider, ProviderDescriptor, ProviderRegistry};
use chatgate::server::{AppState, build_app};

fn app(selector: &str, pairs: &[(&str, &str)]) -> Router {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let registry = ProviderRegistry::from_lookup(Some(selector.to_string()), move |key| {
        env.get(key).cloned()
    });
    let chat = ChatService::new(Arc::new(registry), Duration::from_secs(5)).unwrap();
    build_app(AppState { chat }, 30)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// Health / provider info
// ============================================================================

#[tokio::test]
async fn health_reports_active_provider() {
    let (status, body) = get(app("ollama", &[]), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "provider": "ollama", "model": "llama2"})
    );
}

#[tokio::test]
async fn health_with_unknown_provider_reports_none() {
    let (status, body) = get(app("gemini", &[]), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "provider": "none", "model": "none"}));
}

#[tokio::test]
async fn provider_info_reflects_credentials() {
    let (_, body) = get(app("openai", &[]), "/api/provider").await;
    assert_eq!(
        body,
        json!({"name": "openai", "model": "gpt-4o-mini", "configured": false})
    );

    let (_, body) = get(
        app("openai", &[("OPENAI_API_KEY", "sk-test"), ("OPENAI_MODEL", "gpt-4o")]),
        "/api/provider",
    )
    .await;
    assert_eq!(
        body,
        json!({"name": "openai", "model": "gpt-4o", "configured": true})
    );

    let (_, body) = get(app("ollama", &[]), "/api/provider").await;
    assert_eq!(body["configured"], true);

    let (_, body) = get(app("gemini", &[]), "/api/provider").await;
    assert_eq!(
        body,
        json!({"name": "none", "model": "none", "configured": false})
    );
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn chat_with_ollama() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": {"content": "hello"}})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app("ollama", &[("OLLAMA_BASE_URL", upstream.uri().as_str())]);
    let (status, body) = post_chat(app, json!({"message": "hi"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "hello"}));

    let requests = upstream.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["stream"], false);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1], json!({"role": "user", "content": "hi"}));
}

#[tokio::test]
async fn chat_with_anthropic() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(wiremock::matchers::header("x-api-key", "sk-ant"))
        .and(wiremock::matchers::header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "system": "You are a pirate.",
            "messages": [
                {"role": "user", "content": "ahoy"},
                {"role": "assistant", "content": "arr"},
                {"role": "user", "content": "where is the treasure?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "buried"}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // The Anthropic base URL is fixed, so hand the registry a descriptor
    // pointing at the mock instead of going through the environment.
    let descriptor = ProviderDescriptor {
        base_url: upstream.uri(),
        api_key: Some("sk-ant".to_string()),
        ..ProviderDescriptor::resolve(Provider::Anthropic, |_| None)
    };
    let chat = ChatService::new(
        Arc::new(ProviderRegistry::single(descriptor)),
        Duration::from_secs(5),
    )
    .unwrap();

    let (status, body) = post_chat(
        build_app(AppState { chat }, 30),
        json!({
            "message": "where is the treasure?",
            "soul": "You are a pirate.",
            "history": [
                {"role": "user", "content": "ahoy"},
                {"role": "system", "content": "You are a parrot."},
                {"role": "assistant", "content": "arr"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "buried"}));
}

#[tokio::test]
async fn chat_requires_message() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let uri = upstream.uri();
    let pairs = [("OLLAMA_BASE_URL", uri.as_str())];

    let (status, body) = post_chat(app("ollama", &pairs), json!({"message": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));

    let (status, body) = post_chat(app("ollama", &pairs), json!({"soul": "S"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn chat_treats_null_message_as_missing() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = app("ollama", &[("OLLAMA_BASE_URL", upstream.uri().as_str())]);
    let (status, body) = post_chat(app, json!({"message": null})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn chat_rejects_malformed_body_with_json_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let uri = upstream.uri();
    let pairs = [("OLLAMA_BASE_URL", uri.as_str())];

    let (status, body) = post_chat(
        app("ollama", &pairs),
        json!({
            "message": "hi",
            "history": [{"role": "tool", "content": "output"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("tool"));

    let (status, body) = post_chat(app("ollama", &pairs), json!({"message": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn chat_without_credential_names_the_key() {
    let (status, body) = post_chat(app("anthropic", &[]), json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "No API key configured for anthropic. Set ANTHROPIC_API_KEY environment variable."})
    );
}

#[tokio::test]
async fn chat_without_provider() {
    let (status, body) = post_chat(app("gemini", &[]), json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "No LLM provider configured"}));
}

#[tokio::test]
async fn chat_surfaces_upstream_errors() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(
        "vllm",
        &[
            ("VLLM_BASE_URL", upstream.uri().as_str()),
            ("VLLM_API_KEY", "token"),
        ],
    );
    let (status, body) = post_chat(app, json!({"message": "hi"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "API error (429): slow down"}));
}

#[tokio::test]
async fn chat_with_history_and_soul() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 1024,
            "messages": [
                {"role": "system", "content": "Soul\n\n---\n\nIdentity"},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "reply"},
                {"role": "user", "content": "second"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "done"}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(
        "litellm",
        &[
            ("LITELLM_BASE_URL", upstream.uri().as_str()),
            ("LITELLM_API_KEY", "key"),
        ],
    );
    let (status, body) = post_chat(
        app,
        json!({
            "message": "second",
            "soul": "Soul",
            "identity": "Identity",
            "history": [
                {"role": "system", "content": "sneaky"},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "reply"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "done"}));
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app("ollama", &[]).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
