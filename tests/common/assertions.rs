//! Custom assertion macros for HTTP tests
//!
//! Wrap the checks `tests/api.rs` repeats on `axum-test` responses so a
//! failure prints the response body instead of only the status.

/// Assert the status code of a `TestResponse`
///
/// On mismatch the panic message includes the response body, which for
/// error responses carries the server's `message`.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status_code(),
            $status,
            "unexpected status, body: {}",
            $response.text()
        );
    };
}

/// Assert a JSON error response: status code and `message` field
///
/// Returns the parsed body so callers can check further fields.
#[macro_export]
macro_rules! assert_error_response {
    ($response:expr, $status:expr, $message:expr) => {{
        $crate::assert_status!($response, $status);
        let body: serde_json::Value = $response.json();
        assert_eq!(body["message"], $message, "unexpected error body: {body}");
        body
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
