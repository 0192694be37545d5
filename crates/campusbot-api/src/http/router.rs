//! Axum router configuration with middleware.
//!
//! API routes live under `/api/`. Every other path falls through to the
//! static directory, whose `index.html` is the chat page served at `/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/health", get(handlers::health::health));

    let static_dir = state.static_dir().to_path_buf();
    if !static_dir.is_dir() {
        tracing::warn!(path = %static_dir.display(), "Static directory not found, GET / will 404");
    }

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use campusbot_core::history::store::HistoryStore;
    use campusbot_types::chat::Turn;
    use campusbot_types::config::AppConfig;
    use secrecy::SecretString;
    use tempfile::TempDir;
    use tower::util::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    const SEED: &str = r#"[
        {"role": "user", "parts": [{"fileData": {"mimeType": "application/pdf", "fileUri": "gs://b/handbook.pdf"}}, {"text": "Who are you?"}]},
        {"role": "model", "parts": [{"text": "The OLFU QC Senior High School assistant."}]},
        {"role": "user", "parts": [{"fileData": {"mimeType": "image/png", "fileUri": "gs://b/map.png"}}]}
    ]"#;

    struct TestApp {
        state: AppState,
        server: MockServer,
        _tmp: TempDir,
    }

    impl TestApp {
        async fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let server = MockServer::start().await;

            let static_dir = tmp.path().join("static");
            std::fs::create_dir_all(&static_dir).unwrap();
            std::fs::write(static_dir.join("index.html"), "<html>campus chat</html>").unwrap();
            std::fs::write(tmp.path().join("seed.json"), SEED).unwrap();

            let mut config = AppConfig::default();
            config.model.base_url = server.uri();
            config.paths.base_history = tmp.path().join("seed.json");
            config.paths.static_dir = static_dir;
            config.paths.database = Some(tmp.path().join("test.db"));

            let state = AppState::build(
                tmp.path().to_path_buf(),
                config,
                Some(SecretString::from("test-key".to_string())),
            )
            .await
            .unwrap();

            Self {
                state,
                server,
                _tmp: tmp,
            }
        }

        async fn mock_reply(&self, body: serde_json::Value) {
            Mock::given(method("POST"))
                .and(path(GENERATE_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server)
                .await;
        }

        async fn mock_text(&self, text: &str) {
            self.mock_reply(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            }))
            .await;
        }

        async fn post_chat(&self, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
            let request = Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap();
            self.send(request).await
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
            let response = build_router(self.state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            (status, json)
        }

        async fn stored(&self, session_id: &str) -> Vec<Turn> {
            self.state
                .chat_service
                .history()
                .store()
                .load(session_id)
                .await
                .unwrap()
                .unwrap()
        }

        async fn requests_sent(&self) -> usize {
            self.server.received_requests().await.unwrap_or_default().len()
        }
    }

    #[tokio::test]
    async fn health_returns_ok_with_timestamp() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        let ts = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(app.requests_sent().await, 0);
    }

    #[tokio::test]
    async fn root_serves_index_page() {
        let app = TestApp::new().await;
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = build_router(app.state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("campus chat"));
    }

    #[tokio::test]
    async fn new_session_hello_scenario() {
        let app = TestApp::new().await;
        app.mock_text("Hi there").await;

        let (status, body) = app.post_chat(serde_json::json!({"message": "Hello"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Hi there");
        let sid = body["sessionId"].as_str().unwrap();
        assert!(sid.starts_with("sid_"));

        let history = app.stored(sid).await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], Turn::user("Who are you?"));
        assert_eq!(history[2], Turn::user("Hello"));
        assert_eq!(history[3], Turn::model("Hi there"));
    }

    #[tokio::test]
    async fn continuing_session_grows_history() {
        let app = TestApp::new().await;
        app.mock_text("Sure").await;

        let (_, first) = app.post_chat(serde_json::json!({"message": "Hello"})).await;
        let sid = first["sessionId"].as_str().unwrap().to_string();

        let (status, second) = app
            .post_chat(serde_json::json!({"message": "More", "sessionId": sid}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["sessionId"], sid.as_str());
        let history = app.stored(&sid).await;
        assert_eq!(history.len(), 6);
        assert_eq!(history[4], Turn::user("More"));

        // The second call carried the whole stored conversation plus "More".
        let requests = app.server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(sent["contents"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn unknown_and_empty_session_ids_start_new_sessions() {
        let app = TestApp::new().await;
        app.mock_text("Hi").await;

        for sid in ["sid_unknown", ""] {
            let (status, body) = app
                .post_chat(serde_json::json!({"message": "Hello", "sessionId": sid}))
                .await;
            assert_eq!(status, StatusCode::OK);
            let returned = body["sessionId"].as_str().unwrap();
            assert_ne!(returned, sid);
            assert!(returned.starts_with("sid_"));
        }
    }

    #[tokio::test]
    async fn non_string_session_ids_start_new_sessions() {
        let app = TestApp::new().await;
        app.mock_text("Hi").await;

        for sid in [
            serde_json::json!(123),
            serde_json::json!(["a"]),
            serde_json::json!({"id": "sid_x"}),
            serde_json::Value::Null,
        ] {
            let (status, body) = app
                .post_chat(serde_json::json!({"message": "Hello", "sessionId": sid}))
                .await;
            assert_eq!(status, StatusCode::OK, "{sid}");
            assert_eq!(body["response"], "Hi");
            let returned = body["sessionId"].as_str().unwrap();
            assert!(returned.starts_with("sid_"));
            assert_eq!(app.stored(returned).await.len(), 4);
        }
    }

    #[tokio::test]
    async fn non_json_body_is_415() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "text/plain")
            .body(Body::from("message=Hello"))
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Request must be JSON");
        assert_eq!(app.requests_sent().await, 0);
    }

    #[tokio::test]
    async fn invalid_messages_are_400_without_model_call() {
        let app = TestApp::new().await;

        for payload in [
            serde_json::json!({"message": "   "}),
            serde_json::json!({"message": ""}),
            serde_json::json!({"message": 42}),
            serde_json::json!({"sessionId": "sid_x"}),
        ] {
            let (status, body) = app.post_chat(payload.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body["error"], "Invalid message provided.");
            assert_eq!(body["code"], "INVALID_INPUT");
        }
        assert_eq!(app.requests_sent().await, 0);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{\"message\": "))
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn blocked_response_is_400_with_reason() {
        let app = TestApp::new().await;
        app.mock_reply(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}))
            .await;

        let (status, body) = app.post_chat(serde_json::json!({"message": "bad"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Response blocked due to safety settings (SAFETY). Please rephrase your message."
        );
        assert_eq!(body["code"], "CONTENT_BLOCKED");
    }

    #[tokio::test]
    async fn empty_response_is_500() {
        let app = TestApp::new().await;
        app.mock_reply(serde_json::json!({"candidates": []})).await;

        let (status, body) = app.post_chat(serde_json::json!({"message": "Hello"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Received an empty response from the AI.");
    }

    #[tokio::test]
    async fn provider_failure_is_generic_500() {
        let app = TestApp::new().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&app.server)
            .await;

        let (status, body) = app.post_chat(serde_json::json!({"message": "Hello"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal server error occurred.");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn build_without_api_key_fails() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.database = Some(tmp.path().join("test.db"));

        let result = AppState::build(tmp.path().to_path_buf(), config, None).await;

        let err = result.err().unwrap();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
