//! Tests for the domain error payload and its serde contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code(base_error: Error) {
    assert_eq!(base_error.code(), ErrorCode::InvalidRequest);
    assert_eq!(base_error.message(), "bad");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("serialise error");
    assert_eq!(value, json!({ "code": "invalid_request", "message": "bad" }));

    let traced = base_error
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "days" }));
    let value = serde_json::to_value(&traced).expect("serialise error");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["field"], "days");
}

#[rstest]
#[case(json!({ "code": "not_found", "message": "" }))]
#[case(json!({ "code": "not_found", "message": "x", "traceId": " " }))]
#[case(json!({ "code": "not_found", "message": "x", "unexpected": true }))]
fn deserialisation_enforces_invariants(#[case] payload: serde_json::Value) {
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}

#[rstest]
fn deserialisation_accepts_snake_case_trace_id_alias() {
    let error: Error = serde_json::from_value(json!({
        "code": "service_unavailable",
        "message": "vendor down",
        "trace_id": TRACE_ID,
    }))
    .expect("valid payload");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}
