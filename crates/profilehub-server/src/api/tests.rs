use axum::body::{to_bytes, Body};
use axum::http::Request;
use profilehub_gbp::{AggregatorSettings, BaseUrls, GbpClient};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::aggregate::{CACHED_SOURCE, DYNAMIC_SOURCE};
use super::*;

const TOKEN: &str = "ya29.test-token";

fn test_app(server: &MockServer) -> Router {
    let client =
        GbpClient::with_base_urls(5, "profilehub-test/0.1", &BaseUrls::single(&server.uri()))
            .expect("client");
    let aggregator = Aggregator::new(client, AggregatorSettings::default());
    build_app(AppState::new(aggregator, Duration::from_secs(60)))
}

fn authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .expect("request")
}

fn search_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/business/search-location")
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Account 42 with location 99 ("Cafe X"); every fan-out source succeeds
/// except photos when `photos_fail` is set.
async fn mount_cafe_x(server: &MockServer, photos_fail: bool) {
    mount_get(
        server,
        "/accounts",
        ok(json!({ "accounts": [{ "name": "accounts/42" }] })),
    )
    .await;
    mount_get(
        server,
        "/accounts/42/locations",
        ok(json!({ "locations": [{ "name": "accounts/42/locations/99", "title": "Cafe X" }] })),
    )
    .await;
    mount_get(
        server,
        "/accounts/42/locations/99/reviews",
        ok(json!({
            "reviews": [{ "reviewer": { "displayName": "Ravi" }, "starRating": "FOUR", "comment": "Nice" }],
            "averageRating": 4.0
        })),
    )
    .await;
    let photos = if photos_fail {
        ResponseTemplate::new(500).set_body_json(json!({ "error": { "status": "INTERNAL" } }))
    } else {
        ok(json!({ "mediaItems": [{ "name": "m1" }] }))
    };
    mount_get(server, "/accounts/42/locations/99/media", photos).await;
    Mock::given(method("GET"))
        .and(path("/attributes"))
        .and(query_param_is_missing("category_name"))
        .respond_with(ok(json!({ "attributeMetadata": [{ "parent": "has_wifi" }] })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/attributes"))
        .and(query_param("category_name", "gcid:corporate_office"))
        .respond_with(ok(json!({ "attributeMetadata": [] })))
        .mount(server)
        .await;
    mount_get(
        server,
        "/accounts/42/locations/99",
        ok(json!({ "title": "Cafe X", "primaryPhone": "+91 80 1234 5678" })),
    )
    .await;
}

// -------------------------------------------------------------------------
// Envelope and middleware
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public_and_echoes_request_id() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-123");
}

#[tokio::test]
async fn missing_bearer_is_unauthorized_without_upstream_calls() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            Request::builder()
                .uri("/api/v1/business/single-location-data")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "unauthorized");
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn expired_credential_is_unauthorized() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            Request::builder()
                .uri("/api/v1/business/accounts")
                .header("authorization", format!("Bearer {TOKEN}"))
                .header(CREDENTIAL_EXPIRES_AT, "2001-01-01T00:00:00Z")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[test]
fn map_gbp_error_assigns_statuses() {
    let cases = [
        (GbpError::Auth("no token".into()), StatusCode::UNAUTHORIZED),
        (GbpError::NotFound("none".into()), StatusCode::NOT_FOUND),
        (
            GbpError::Upstream {
                status: 429,
                body: Value::Null,
            },
            StatusCode::TOO_MANY_REQUESTS,
        ),
        (
            GbpError::Cancelled {
                stage: "resolution",
            },
            StatusCode::GATEWAY_TIMEOUT,
        ),
        (
            GbpError::Decode {
                context: "reviews".into(),
                source: serde_json::from_str::<Value>("{").unwrap_err(),
            },
            StatusCode::BAD_GATEWAY,
        ),
    ];

    for (error, expected) in cases {
        let response = map_gbp_error("req-1".to_string(), &error).into_response();
        assert_eq!(response.status(), expected, "for {error:?}");
    }
}

#[test]
fn cache_key_treats_blank_hint_as_absent_but_keeps_other_hints_verbatim() {
    let credential = Credential::new(TOKEN);
    let key = |hint: Option<&str>| cache_key(EndpointClass::Aggregate, &credential, &[hint]);

    assert_eq!(key(Some("   ")), key(None));
    assert_eq!(key(Some("99")), key(Some("99")));
    assert_ne!(key(Some(" 99")), key(Some("99")));
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -------------------------------------------------------------------------
// Aggregation entry point
// -------------------------------------------------------------------------

#[tokio::test]
async fn single_location_data_reports_failed_photos_source() {
    let server = MockServer::start().await;
    mount_cafe_x(&server, true).await;

    let response = test_app(&server)
        .oneshot(authed("/api/v1/business/single-location-data"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], DYNAMIC_SOURCE);
    assert_eq!(json["location"]["title"], "Cafe X");
    assert_eq!(json["location"]["name"], "accounts/42/locations/99");
    assert_eq!(json["reviews"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["reviews"][0]["rating"], 4);
    assert_eq!(json["photos"], json!([]));
    assert_eq!(json["attributes"].as_array().map(Vec::len), Some(1));

    let errors = json["errors"].as_object().expect("errors object");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["photos"]["kind"], "upstream");
    assert_eq!(errors["photos"]["status"], 500);
}

#[tokio::test]
async fn complete_aggregation_is_served_from_cache_next_time() {
    let server = MockServer::start().await;
    mount_cafe_x(&server, false).await;
    let app = test_app(&server);
    let uri = "/api/v1/business/single-location-data?accountId=accounts/42&locationId=99";

    let first = json_body(app.clone().oneshot(authed(uri)).await.expect("response")).await;
    assert_eq!(first["source"], DYNAMIC_SOURCE);
    assert_eq!(first["errors"], json!({}));
    let calls_after_first = server.received_requests().await.unwrap_or_default().len();
    assert_eq!(calls_after_first, 5, "hints should skip resolution");

    let second = json_body(app.oneshot(authed(uri)).await.expect("response")).await;
    assert_eq!(second["source"], CACHED_SOURCE);
    assert_eq!(second["location"]["title"], "Cafe X");
    let calls_after_second = server.received_requests().await.unwrap_or_default().len();
    assert_eq!(calls_after_second, calls_after_first);
}

#[tokio::test]
async fn partial_aggregation_is_not_cached() {
    let server = MockServer::start().await;
    mount_cafe_x(&server, true).await;
    let app = test_app(&server);
    let uri = "/api/v1/business/single-location-data?accountId=accounts/42&locationId=99";

    let _ = app.clone().oneshot(authed(uri)).await.expect("response");
    let second = json_body(app.oneshot(authed(uri)).await.expect("response")).await;

    assert_eq!(second["source"], DYNAMIC_SOURCE);
    let calls = server.received_requests().await.unwrap_or_default().len();
    assert_eq!(calls, 10);
}

#[tokio::test]
async fn no_accounts_is_not_found() {
    let server = MockServer::start().await;
    mount_get(&server, "/accounts", ok(json!({ "accounts": [] }))).await;

    let response = test_app(&server)
        .oneshot(authed("/api/v1/business/single-location-data"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn resolution_upstream_failure_passes_status_and_body_through() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/accounts",
        ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "status": "PERMISSION_DENIED" }
        })),
    )
    .await;

    let response = test_app(&server)
        .oneshot(authed("/api/v1/business/single-location-data"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(
        json["error"]["details"]["error"]["status"],
        "PERMISSION_DENIED"
    );
}

// -------------------------------------------------------------------------
// Single-endpoint routes
// -------------------------------------------------------------------------

#[tokio::test]
async fn accounts_are_memoized_per_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ok(json!({ "accounts": [{ "name": "accounts/42" }] })))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed("/api/v1/business/accounts"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["accounts"][0]["name"], "accounts/42");
    }
}

#[tokio::test]
async fn locations_resolve_the_first_account() {
    let server = MockServer::start().await;
    mount_cafe_x(&server, false).await;

    let response = test_app(&server)
        .oneshot(authed("/api/v1/business/locations"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["account"], "accounts/42");
    assert_eq!(json["data"]["locations"][0]["title"], "Cafe X");
}

#[tokio::test]
async fn reviews_route_normalizes_reviews() {
    let server = MockServer::start().await;
    mount_cafe_x(&server, false).await;

    let response = test_app(&server)
        .oneshot(authed(
            "/api/v1/business/reviews?accountId=accounts/42&locationId=99",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 1);
    assert_eq!(json["averageRating"], 4.0);
    assert_eq!(json["reviews"][0]["reviewerName"], "Ravi");
}

#[tokio::test]
async fn search_requires_a_query() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(search_request(&json!({ "query": "   " })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/googleLocations:search"))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(search_request(&json!({ "query": "Nowhere Cafe" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_returns_flattened_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/googleLocations:search"))
        .respond_with(ok(json!({
            "googleLocations": [{
                "name": "googleLocations/abc",
                "location": { "title": "Startup Labs", "websiteUri": "https://labs.example" },
                "requestAdminRightsUri": "https://business.google.com/arc/p/abc"
            }]
        })))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(search_request(&json!({ "query": "Startup Labs" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["googleLocations"][0]["title"], "Startup Labs");
    assert_eq!(json["googleLocations"][0]["phoneNumbers"], json!({}));
    assert_eq!(
        json["googleLocations"][0]["requestAdminRightsUri"],
        "https://business.google.com/arc/p/abc"
    );
}
