//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI document (disable with `BUDDY_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - `/v1` travel plan and chat routes

pub mod doc;
mod health;
mod v1;

use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/v1", v1::router());

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(
            state.config.cors_allowed_origins.as_deref(),
        )))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use buddy_app_core::chat::prompt::FALLBACK_REPLY;
    use buddy_app_core::chat::ChatService;
    use buddy_app_core::completion::CompletionClient;
    use buddy_app_core::entities::SqliteStore;
    use buddy_app_core::{AuthError, CompletionError};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Replies with the user's text so tests can see what was sent.
    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, _: &str, user_text: &str, _: &str) -> Result<String, CompletionError> {
            Ok(format!("You said: {user_text}"))
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _: &str, _: &str, _: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Status {
                status: 429,
                body: "rate limited".into(),
            })
        }
    }

    async fn app_with(client: Result<Arc<dyn CompletionClient>, AuthError>) -> Router {
        let state = Arc::new(AppState {
            config: Arc::new(Config::default()),
            store: Arc::new(SqliteStore::in_memory().await.unwrap()),
            chat: Arc::new(ChatService::new(client)),
        });
        build(state)
    }

    async fn app() -> Router {
        let client: Arc<dyn CompletionClient> = Arc::new(EchoClient);
        app_with(Ok(client)).await
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    fn japan_vacation() -> Value {
        json!({
            "client_name": "Hana",
            "user_code": "TB-042",
            "start_date": "2025-04-01",
            "end_date": "2025-04-10",
            "budget": 50000,
            "event_type": "Vacation",
            "country": "Japan",
            "state": "Tokyo",
            "city": "Other",
            "major_location": "Mountain",
            "preferences": "onsen, vegetarian food"
        })
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/v1/chat/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn health_reports_ok_and_chat_readiness() {
        let (status, body) = send(&app().await, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["chat"], "ready");
        assert!(!body["version"].as_str().unwrap_or("").is_empty());

        let app = app_with(Err(AuthError::MissingApiKey)).await;
        let (_, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(body["chat"], "unavailable");
    }

    #[tokio::test]
    async fn options_expose_widget_choices() {
        let (status, body) = send(&app().await, Method::GET, "/v1/travel-plans/options", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["event_types"],
            json!(["Wedding", "Shopping", "Official Meeting", "Other Events", "Vacation"])
        );
        assert_eq!(body["budget"], json!({ "min": 0, "max": 100000, "step": 1000, "default": 50000 }));
        assert_eq!(body["major_locations"], json!(["Beach", "Mountain", "Desert", "Other"]));
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (status, body) = send(&app().await, Method::GET, "/v1/travel-plans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn submitted_plan_is_listed() {
        let app = app().await;

        let (status, body) = send(&app, Method::POST, "/v1/travel-plans", Some(japan_vacation())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["country"], "Japan");
        let overview: Vec<&str> = body["overview"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(overview.len(), 11);
        assert_eq!(overview[0], "Client Name: Hana");
        assert_eq!(overview[4], "Budget: ₹50000");
        assert_eq!(overview[5], "Event Type: Vacation");

        let (status, body) = send(&app, Method::GET, "/v1/travel-plans", None).await;
        assert_eq!(status, StatusCode::OK);
        let plans = body.as_array().unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0]["record"], japan_vacation());
        assert!(plans[0]["summary"].as_str().unwrap().contains("Country: Japan"));
    }

    #[tokio::test]
    async fn plans_keep_submission_order() {
        let app = app().await;
        for name in ["first", "second", "third"] {
            let mut plan = japan_vacation();
            plan["client_name"] = json!(name);
            let (status, _) = send(&app, Method::POST, "/v1/travel-plans", Some(plan)).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, body) = send(&app, Method::GET, "/v1/travel-plans", None).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["record"]["client_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn out_of_range_budget_is_rejected() {
        let app = app().await;
        let mut plan = japan_vacation();
        plan["budget"] = json!(100_001);

        let (status, body) = send(&app, Method::POST, "/v1/travel-plans", Some(plan)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, body) = send(&app, Method::GET, "/v1/travel-plans", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn unknown_event_type_is_rejected() {
        let mut plan = japan_vacation();
        plan["event_type"] = json!("Conference");
        let (status, body) = send(&app().await, Method::POST, "/v1/travel-plans", Some(plan)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn chat_turn_round_trip() {
        let app = app().await;
        let id = new_session(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/v1/chat/sessions/{id}/messages"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["messages"],
            json!([{ "role": "assistant", "content": "Welcome to Travel Buddy! How can I assist you today?" }])
        );

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/v1/chat/sessions/{id}/messages"),
            Some(json!({ "content": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "You said: Hi");
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_completion_still_answers_with_fallback() {
        let client: Arc<dyn CompletionClient> = Arc::new(FailingClient);
        let app = app_with(Ok(client)).await;
        let id = new_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/v1/chat/sessions/{id}/messages"),
            Some(json!({ "content": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], FALLBACK_REPLY);
        assert!(body["error"].as_str().unwrap().contains("429"));
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages[1], json!({ "role": "user", "content": "Hi" }));
        assert_eq!(messages[2], json!({ "role": "assistant", "content": FALLBACK_REPLY }));
    }

    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let app = app_with(Err(AuthError::MissingApiKey)).await;
        let id = new_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/v1/chat/sessions/{id}/messages"),
            Some(json!({ "content": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("GROQ_API_KEY"));

        // Travel plans are unaffected.
        let (status, _) = send(&app, Method::POST, "/v1/travel-plans", Some(japan_vacation())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_message_is_bad_request() {
        let app = app().await;
        let id = new_session(&app).await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/v1/chat/sessions/{id}/messages"),
            Some(json!({ "content": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, &format!("/v1/chat/sessions/{id}/messages"), None).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let app = app().await;
        let id = new_session(&app).await;

        let (_, body) = send(&app, Method::GET, "/v1/chat/sessions", None).await;
        assert_eq!(body["sessions"], json!([id]));

        let (status, body) = send(&app, Method::DELETE, &format!("/v1/chat/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/v1/chat/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, &format!("/v1/chat/sessions/{id}/messages"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(&app().await, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/v1/travel-plans"].is_object());
    }
}
