use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies up to this size are logged verbatim, at `debug` only since
/// travel plans carry names and contact details.
const MAX_LOGGED_BODY: usize = 1024;

/// Assign (or propagate) an `x-trace-id`, run the request inside a span
/// carrying it, and log status and latency. Bodies are logged at `debug`.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    // A hyphenated UUID is always a valid header value.
    let trace_header = HeaderValue::from_str(&trace_id.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let (parts, body) = req.into_parts();
        let req_bytes = buffer_and_log("request", &parts.headers, body).await;
        let mut req = Request::from_parts(parts, Body::from(req_bytes));
        req.headers_mut().insert(X_TRACE_ID, trace_header.clone());

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let res_bytes = buffer_and_log("response", &parts.headers, body).await;
        let mut response = Response::from_parts(parts, Body::from(res_bytes));
        response.headers_mut().insert(X_TRACE_ID, trace_header);

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

async fn buffer_and_log(direction: &str, headers: &header::HeaderMap, body: Body) -> Bytes {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let is_json = content_type.contains("application/json");

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(direction, error = %e, "failed to buffer body");
            return Bytes::new();
        }
    };

    if is_json && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            debug!("{direction} body: {text}");
        }
    } else if !bytes.is_empty() {
        debug!("{direction} body: [skipped: type={content_type}, size={}]", bytes.len());
    }

    bytes
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route(
                "/echo",
                post(|Json(v): Json<serde_json::Value>| async move { Json(v) }),
            )
            .layer(axum::middleware::from_fn(trace_middleware))
    }

    #[tokio::test]
    #[traced_test]
    async fn assigns_trace_id_when_missing() {
        let response = app()
            .oneshot(axum::http::Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response.headers().get(X_TRACE_ID).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert!(logs_contain("response finished"));
    }

    #[tokio::test]
    async fn propagates_incoming_trace_id() {
        let id = Uuid::new_v4().to_string();
        let response = app()
            .oneshot(
                axum::http::Request::get("/ping")
                    .header(X_TRACE_ID, &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get(X_TRACE_ID).unwrap(), id.as_str());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"pong");
    }

    #[tokio::test]
    #[traced_test]
    async fn json_bodies_stay_below_info() {
        let response = app()
            .oneshot(
                axum::http::Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"ana@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        assert!(logs_contain("request body"));
        logs_assert(|lines: &[&str]| {
            let leaked: Vec<_> = lines
                .iter()
                .filter(|line| line.contains("ana@example.com") && !line.contains("DEBUG"))
                .collect();
            if leaked.is_empty() {
                Ok(())
            } else {
                Err(format!("body logged above debug: {leaked:?}"))
            }
        });
    }
}
