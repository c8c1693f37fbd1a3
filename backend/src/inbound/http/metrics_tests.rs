//! Tests for metric HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CACHE_CONTROL};
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::UserId;
use crate::domain::ports::{MockMetricsCommand, MockMetricsQuery};
use crate::inbound::http::api_scope;
use crate::inbound::http::test_utils::{
    OTHER_SECRET, bearer, fixture_state, mint_expired_token, mint_token,
};
use crate::outbound::token::JwtAccessTokens;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}

fn reading_body(temperature: f64) -> Value {
    json!({ "temperature": temperature, "humidity": 45.0, "airQuality": "Good" })
}

async fn post_metric(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = actix_test::TestRequest::post()
        .uri("/api/metrics")
        .insert_header((AUTHORIZATION, bearer(token)))
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn get_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
    token: &str,
) -> (StatusCode, Value) {
    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header((AUTHORIZATION, bearer(token)))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// State whose metric ports fail the test if they are reached at all.
fn untouchable_store_state() -> HttpState {
    let mut command = MockMetricsCommand::new();
    command.expect_record_metric().never();
    let mut query = MockMetricsQuery::new();
    query.expect_latest_metric().never();
    query.expect_metric_history().never();

    let mut state = fixture_state();
    state.metrics = Arc::new(command);
    state.metrics_query = Arc::new(query);
    state
}

fn credential(kind: &str) -> Option<String> {
    let user_id = UserId::random();
    match kind {
        "missing" => None,
        "garbage" => Some(bearer("not.a.jwt")),
        "expired" => Some(bearer(&mint_expired_token(&user_id))),
        "wrong_scheme" => Some(format!("Basic {}", mint_token(&user_id))),
        "foreign_secret" => {
            let token = JwtAccessTokens::new(OTHER_SECRET)
                .issue(&user_id)
                .expect("token minted");
            Some(bearer(&token))
        }
        other => panic!("unknown credential kind {other}"),
    }
}

#[rstest]
#[actix_web::test]
async fn rejected_tokens_never_reach_the_store(
    #[values("GET /api/metrics/latest", "GET /api/metrics/history", "POST /api/metrics")]
    route: &str,
    #[values("missing", "garbage", "expired", "wrong_scheme", "foreign_secret")] kind: &str,
) {
    let app = actix_test::init_service(test_app(untouchable_store_state())).await;
    let (method, uri) = route.split_once(' ').expect("method and path");
    let mut request = match method {
        "POST" => actix_test::TestRequest::post().set_json(reading_body(21.0)),
        _ => actix_test::TestRequest::get(),
    }
    .uri(uri);
    if let Some(value) = credential(kind) {
        request = request.insert_header((AUTHORIZATION, value));
    }

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn record_metric_ignores_body_user_id() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let owner = UserId::random();
    let impostor = UserId::random();

    let mut body = reading_body(22.5);
    body["userId"] = Value::String(impostor.to_string());
    let (status, created) = post_metric(&app, &mint_token(&owner), body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], owner.to_string());
    assert_eq!(created["temperature"], 22.5);
    assert_eq!(created["airQuality"], "Good");
    assert!(created["id"].as_str().is_some());
    assert!(created["timestamp"].as_str().is_some());
}

#[actix_web::test]
async fn record_metric_accepts_implausible_values() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let token = mint_token(&UserId::random());

    let body = json!({ "temperature": -80.0, "humidity": -5.0, "airQuality": "Poor" });
    let (status, created) = post_metric(&app, &token, body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["humidity"], -5.0);
}

#[rstest]
#[case::unknown_air_quality(json!({ "temperature": 20.0, "humidity": 40.0, "airQuality": "Great" }))]
#[case::string_temperature(json!({ "temperature": "warm", "humidity": 40.0, "airQuality": "Good" }))]
#[case::missing_humidity(json!({ "temperature": 20.0, "airQuality": "Good" }))]
#[actix_web::test]
async fn record_metric_reports_malformed_bodies_as_internal_errors(#[case] body: Value) {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let owner = UserId::random();
    let token = mint_token(&owner);

    let (status, error) = post_metric(&app, &token, body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "internal_error");
    assert_eq!(error["message"], "Internal server error");
    assert!(error.get("details").is_none());

    let (status, _) = get_json(&app, "/api/metrics/latest", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn latest_metric_is_not_found_before_first_record() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let token = mint_token(&UserId::random());

    let (status, error) = get_json(&app, "/api/metrics/latest", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "not_found");
}

#[actix_web::test]
async fn latest_metric_returns_newest_record_with_no_cache_header() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let token = mint_token(&UserId::random());
    post_metric(&app, &token, reading_body(20.0)).await;
    let (_, second) = post_metric(&app, &token, reading_body(21.0)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/metrics/latest")
        .insert_header((AUTHORIZATION, bearer(&token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
    let latest: Value = actix_test::read_body_json(response).await;
    assert_eq!(latest["id"], second["id"]);
}

#[actix_web::test]
async fn history_is_capped_at_ten_and_scoped_to_caller() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let owner = mint_token(&UserId::random());
    let stranger = mint_token(&UserId::random());
    for temperature in 0..12 {
        post_metric(&app, &owner, reading_body(f64::from(temperature))).await;
    }
    post_metric(&app, &stranger, reading_body(99.0)).await;

    let (status, history) = get_json(&app, "/api/metrics/history", &owner).await;

    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().expect("array body");
    assert_eq!(entries.len(), 10);
    assert!(entries.iter().all(|m| m["temperature"] != 99.0));
}

#[actix_web::test]
async fn history_is_empty_for_new_user() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let token = mint_token(&UserId::random());

    let (status, history) = get_json(&app, "/api/metrics/history", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([]));
}

#[actix_web::test]
async fn storage_faults_are_redacted() {
    let mut query = MockMetricsQuery::new();
    query
        .expect_latest_metric()
        .return_once(|_| Err(Error::internal("connection refused: db.internal:5432")));
    let mut state = fixture_state();
    state.metrics_query = Arc::new(query);
    let app = actix_test::init_service(test_app(state)).await;
    let token = mint_token(&UserId::random());

    let (status, error) = get_json(&app, "/api/metrics/latest", &token).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "internal_error");
    assert_eq!(error["message"], "Internal server error");
}
