//! Common test utilities for integration tests
//!
//! Each `TestContext` owns a fresh in-memory store and a manual clock, so
//! tests run without a database and can move time forward at will.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use orgauth_api::app::{build_router, AppState};
use orgauth_api::config::{ApiConfig, Config, CorsOrigins, DatabaseConfig, JwtConfig, LogFormat};
use orgauth_shared::clock::ManualClock;
use orgauth_shared::store::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret-password";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: InMemoryStore,
    pub clock: Arc<ManualClock>,
    pub app: Router,
}

/// A user registered through the API
pub struct Registered {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

impl Registered {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Status and parsed JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: CorsOrigins::Any,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            ttl_minutes: 60,
        },
        log_format: LogFormat::Pretty,
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(Arc::new(store.clone()), clock.clone(), test_config());

        Self {
            store,
            clock,
            app: build_router(state),
        }
    }

    pub fn advance(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }

    /// Sends a request, with an optional bearer header and JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a raw JSON body as-is
    pub async fn send_raw(&self, method: &str, uri: &str, raw: &'static str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();

        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    /// Registers `first_name` with a unique email and returns its session
    pub async fn register(&self, first_name: &str) -> Registered {
        let email = format!("{}@example.com", first_name.to_lowercase());
        let response = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "firstName": first_name,
                    "lastName": "Tester",
                    "email": email,
                    "password": PASSWORD,
                    "phone": "0123456789"
                })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        Registered {
            user_id: response.body["data"]["user"]["userId"]
                .as_str()
                .unwrap()
                .to_string(),
            email,
            token: response.body["data"]["accessToken"]
                .as_str()
                .unwrap()
                .to_string(),
        }
    }

    /// orgIds of the organizations `user` can list
    pub async fn org_ids(&self, user: &Registered) -> Vec<String> {
        let response = self
            .send("GET", "/api/organisations", Some(&user.auth_header()), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);

        response.body["data"]["organizations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|org| org["orgId"].as_str().unwrap().to_string())
            .collect()
    }

    /// Creates an organization as `user` and returns its orgId
    pub async fn create_org(&self, user: &Registered, name: &str) -> String {
        let response = self
            .send(
                "POST",
                "/api/organisations",
                Some(&user.auth_header()),
                Some(json!({ "name": name, "description": "Test organization" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["data"]["orgId"].as_str().unwrap().to_string()
    }
}
