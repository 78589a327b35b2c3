use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::users;

pub fn build_app(state: AppState) -> Router {
    let prefix = state.config.api_prefix.clone();
    Router::new()
        .nest(&prefix, users::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const PREFIX: &str = crate::config::DEFAULT_API_PREFIX;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/json");
        }
        let req = req
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("request");
        let res = app.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn new_user_body(email: &str) -> String {
        json!({
            "email": email,
            "password_hash": "h",
            "full_name": "A",
            "phone_number": "1",
            "address": "addr",
            "profile_picture_url": "u",
            "is_active": true,
            "is_verified": false,
            "created_at": "2024-01-01",
            "updated_at": "2024-01-01"
        })
        .to_string()
    }

    #[tokio::test]
    async fn health_answers_outside_the_prefix() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn every_route_is_served_under_the_prefix() {
        let app = build_app(AppState::fake());

        let (status, body) = send(&app, Method::GET, &format!("{PREFIX}/getall"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "No Records found"}));

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{PREFIX}/create"),
            Some(&new_user_body("a@x.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"success": true, "message": "New user record created successfully"})
        );

        let (status, body) = send(&app, Method::GET, &format!("{PREFIX}/getall"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalStudents"], 1);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("{PREFIX}/update/a@x.com"),
            Some(r#"{"full_name":"B","is_verified":true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User details updated successfully");

        let (status, body) = send(&app, Method::GET, &format!("{PREFIX}/get/1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["userDetails"]["full_name"], "B");
        assert_eq!(body["userDetails"]["is_verified"], true);
        assert_eq!(body["userDetails"]["address"], "addr");
        assert_eq!(body["userDetails"]["created_at"], "2024-01-01T00:00:00Z");

        let (status, body) = send(&app, Method::DELETE, &format!("{PREFIX}/delete/1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        let (status, body) = send(&app, Method::GET, &format!("{PREFIX}/get/1"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No records found");
    }

    #[tokio::test]
    async fn routes_reject_the_wrong_verb() {
        let app = build_app(AppState::fake());
        let (status, _) = send(&app, Method::GET, &format!("{PREFIX}/create"), None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = send(&app, Method::POST, &format!("{PREFIX}/delete/1"), None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn routes_are_not_mounted_at_the_root() {
        let app = build_app(AppState::fake());
        let (status, _) = send(&app, Method::GET, "/getall", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_is_a_400_envelope() {
        let app = build_app(AppState::fake());

        let (status, body) =
            send(&app, Method::POST, &format!("{PREFIX}/create"), Some("{bad json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("JSON"));
        assert!(body.get("error").is_none());

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("{PREFIX}/update/a@x.com"),
            Some(r#"{"updated_at":"soon"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("soon"));
    }

    #[tokio::test]
    async fn create_with_missing_field_through_the_router_is_400() {
        let app = build_app(AppState::fake());
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{PREFIX}/create"),
            Some(r#"{"email":"a@x.com","is_active":false}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "message": "Please provide all fields"}));
    }
}
