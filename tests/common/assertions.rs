//! Custom assertion macros
//!
//! Failing status checks print the response body, which usually carries the
//! error message that explains the failure.

/// Assert the status of a `(StatusCode, Value)` response
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        let (status, body) = &$response;
        assert_eq!(*status, $status, "unexpected status, body: {}", body);
    };
}

/// Assert that a JSON error body carries the given message
#[macro_export]
macro_rules! assert_message {
    ($response:expr, $message:expr) => {
        let (_, body) = &$response;
        assert_eq!(body["message"], $message, "body: {}", body);
    };
}
