/// End-to-end tests for the HTTP surface
///
/// These drive the full router (validation, auth middleware, services and
/// the in-memory store) the way a client would.

mod common;

use axum::http::StatusCode;
use common::{TestContext, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_register_creates_default_organization() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": PASSWORD
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["message"], "Registration successful");

    let data = &response.body["data"];
    assert!(!data["accessToken"].as_str().unwrap().is_empty());
    assert_eq!(data["user"]["firstName"], "Ada");
    assert_eq!(data["user"]["lastName"], "Lovelace");
    assert_eq!(data["user"]["email"], "ada@example.com");
    assert!(data["user"].get("password").is_none());
    assert!(data["user"].get("passwordHash").is_none());

    let auth = format!("Bearer {}", data["accessToken"].as_str().unwrap());
    let orgs = ctx.send("GET", "/api/organisations", Some(&auth), None).await;
    let orgs = orgs.body["data"]["organizations"].as_array().unwrap().clone();

    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0]["name"], "Ada's Organization");
}

#[tokio::test]
async fn test_register_longest_first_name() {
    let ctx = TestContext::new();
    let first_name = "A".repeat(255);

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": first_name,
                "lastName": "Tester",
                "email": "long@example.com",
                "password": PASSWORD
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["user"]["firstName"], first_name.as_str());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let ctx = TestContext::new();
    ctx.register("Ada").await;

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Other",
                "lastName": "Person",
                "email": "ADA@example.com",
                "password": PASSWORD
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"][0]["field"], "email");
    assert_eq!(ctx.store.user_count(), 1);
    assert_eq!(ctx.store.organization_count(), 1);
}

#[tokio::test]
async fn test_missing_fields_are_reported_in_camel_case() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "email": "ada@example.com" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["firstName", "lastName", "password"]);
    assert_eq!(ctx.store.user_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .send_raw("POST", "/api/auth/register", "{\"firstName\": ")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
}

#[tokio::test]
async fn test_login_matches_registration_shape() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;

    let response = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": ada.email, "password": PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["data"]["user"]["userId"], ada.user_id.as_str());
    assert!(!response.body["data"]["accessToken"]
        .as_str()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;

    let wrong_password = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": ada.email, "password": "not-the-password" })),
        )
        .await;
    let unknown_email = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["status"], "Incorrect credentials");
    assert_eq!(wrong_password.body["message"], "Authentication failed");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;

    for auth in [None, Some("Bearer not-a-token"), Some("Basic abc")] {
        let response = ctx.send("GET", "/api/organisations", auth, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["statusCode"], 401);
    }

    let uri = format!("/api/users/{}", ada.user_id);
    let response = ctx.send("GET", &uri, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected_everywhere() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let org_id = ctx.org_ids(&ada).await.remove(0);
    let auth = ada.auth_header();

    let routes = [
        ("GET", "/api/organisations".to_string()),
        ("GET", format!("/api/organisations/{}", org_id)),
        ("GET", format!("/api/organisations/{}/users", org_id)),
        ("GET", format!("/api/users/{}", ada.user_id)),
    ];

    for (method, uri) in &routes {
        let response = ctx.send(method, uri, Some(&auth), None).await;
        assert_eq!(response.status, StatusCode::OK, "{} {}", method, uri);
    }

    ctx.advance(61);

    for (method, uri) in &routes {
        let response = ctx.send(method, uri, Some(&auth), None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response.body["message"], "Token expired");
    }

    let writes = [
        ("/api/organisations".to_string(), json!({ "name": "Late" })),
        (
            format!("/api/organisations/{}/users", org_id),
            json!({ "userId": ada.user_id }),
        ),
    ];

    for (uri, body) in writes {
        let response = ctx.send("POST", &uri, Some(&auth), Some(body)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "POST {}", uri);
        assert_eq!(response.body["message"], "Token expired");
    }
    assert_eq!(ctx.store.organization_count(), 1);
}

#[tokio::test]
async fn test_organization_visibility_is_membership_gated() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let bob = ctx.register("Bob").await;
    let ada_org = ctx.org_ids(&ada).await.remove(0);

    let uri = format!("/api/organisations/{}", ada_org);

    let response = ctx.send("GET", &uri, Some(&bob.auth_header()), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Organization not found");

    let response = ctx.send("GET", &uri, Some(&ada.auth_header()), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["orgId"], ada_org.as_str());
    assert_eq!(response.body["data"]["name"], "Ada's Organization");

    let missing = ctx
        .send(
            "GET",
            "/api/organisations/does-not-exist",
            Some(&bob.auth_header()),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body, response_not_found());
}

fn response_not_found() -> serde_json::Value {
    json!({
        "status": "Not found",
        "message": "Organization not found",
        "statusCode": 404
    })
}

#[tokio::test]
async fn test_listing_contains_exactly_own_organizations() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let bob = ctx.register("Bob").await;

    let default_org = ctx.org_ids(&ada).await.remove(0);
    let second_org = ctx.create_org(&ada, "Analytical Engines").await;
    ctx.create_org(&bob, "Bob's Side Project").await;

    assert_eq!(ctx.org_ids(&ada).await, vec![default_org, second_org]);
    assert_eq!(ctx.org_ids(&bob).await.len(), 2);
}

#[tokio::test]
async fn test_create_organization_validation() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;

    let response = ctx
        .send(
            "POST",
            "/api/organisations",
            Some(&ada.auth_header()),
            Some(json!({ "description": "No name" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"][0]["field"], "name");
    assert_eq!(ctx.store.organization_count(), 1);
}

#[tokio::test]
async fn test_add_member_is_reflected_in_listing() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let bob = ctx.register("Bob").await;
    let org_id = ctx.create_org(&ada, "Analytical Engines").await;
    let uri = format!("/api/organisations/{}/users", org_id);

    let response = ctx
        .send(
            "POST",
            &uri,
            Some(&ada.auth_header()),
            Some(json!({ "userId": bob.user_id })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"status": "success", "message": "User added to organization successfully"})
    );
    assert!(ctx.org_ids(&bob).await.contains(&org_id));

    // Adding again changes nothing
    let again = ctx
        .send(
            "POST",
            &uri,
            Some(&ada.auth_header()),
            Some(json!({ "userId": bob.user_id })),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(ctx.org_ids(&bob).await.len(), 2);

    let members = ctx.send("GET", &uri, Some(&bob.auth_header()), None).await;
    assert_eq!(members.status, StatusCode::OK);
    assert_eq!(members.body["data"]["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_member_requires_membership() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let bob = ctx.register("Bob").await;
    let ada_org = ctx.org_ids(&ada).await.remove(0);
    let uri = format!("/api/organisations/{}/users", ada_org);

    let response = ctx
        .send(
            "POST",
            &uri,
            Some(&bob.auth_header()),
            Some(json!({ "userId": bob.user_id })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!ctx.org_ids(&bob).await.contains(&ada_org));

    let unknown_user = ctx
        .send(
            "POST",
            &uri,
            Some(&ada.auth_header()),
            Some(json!({ "userId": "no-such-user" })),
        )
        .await;
    assert_eq!(unknown_user.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_user.body["message"], "User not found");

    let missing = ctx
        .send("POST", &uri, Some(&ada.auth_header()), Some(json!({})))
        .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing.body["errors"][0]["field"], "userId");
}

#[tokio::test]
async fn test_user_visibility_follows_shared_organizations() {
    let ctx = TestContext::new();
    let ada = ctx.register("Ada").await;
    let bob = ctx.register("Bob").await;
    let bob_uri = format!("/api/users/{}", bob.user_id);

    let own = ctx
        .send("GET", &bob_uri, Some(&bob.auth_header()), None)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["message"], "User retrieved successfully");
    assert_eq!(own.body["data"]["userId"], bob.user_id.as_str());

    let stranger = ctx
        .send("GET", &bob_uri, Some(&ada.auth_header()), None)
        .await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let org_id = ctx.org_ids(&ada).await.remove(0);
    ctx.send(
        "POST",
        &format!("/api/organisations/{}/users", org_id),
        Some(&ada.auth_header()),
        Some(json!({ "userId": bob.user_id })),
    )
    .await;

    let colleague = ctx
        .send("GET", &bob_uri, Some(&ada.auth_header()), None)
        .await;
    assert_eq!(colleague.status, StatusCode::OK);
    assert_eq!(colleague.body["data"]["email"], bob.email.as_str());
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");
}
