//! Problem Details assertions for gateway tests
//!
//! Validates the stable error contract without depending on gateway types.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Local mirror of the gateway's ProblemDetails body.
#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    #[allow(dead_code)]
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

/// Assert that response parts conform to the error contract:
/// status, `application/problem+json` content type, an `x-trace-id` header
/// matching the body's `trace_id`, and the expected code/detail.
pub fn assert_problem_details_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let header_trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present");
    assert!(!header_trace_id.is_empty());

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body).expect("body should parse as ProblemDetails");

    assert_eq!(problem.status, expected_status.as_u16());
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.trace_id, header_trace_id);
    assert!(
        problem.type_.ends_with(expected_code),
        "type URI should end with the code"
    );

    if let Some(fragment) = expected_detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "detail {:?} should contain {fragment:?}",
            problem.detail
        );
    }
}
