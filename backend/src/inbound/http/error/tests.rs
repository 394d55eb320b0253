//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = to_bytes(response.into_body()).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[actix_rt::test]
async fn not_found_renders_html_with_trace_header() {
    let error = Error::not_found("user 7 does not exist").with_trace_id(TRACE_ID);
    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("text/html"));
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    assert_eq!(header, Some(TRACE_ID));

    let body = body_text(response).await;
    assert!(body.contains("user 7 does not exist"));
    assert!(body.contains(TRACE_ID));
}

#[actix_rt::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}));
    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("Internal server error"));
    assert!(!body.contains("connection string leaked"));
    assert!(body.contains(TRACE_ID));
}

#[actix_rt::test]
async fn missing_trace_id_omits_header() {
    let error = Error::invalid_request("bad");
    let response = ResponseError::error_response(&error);

    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadRequest("raw detail");
    let error = Error::from(actix_error);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}
