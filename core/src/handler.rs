use tracing::{debug, info};

use crate::errors::{GreeterError, Result};
use crate::event::{IncomingEvent, OutgoingResponse};

/// Handles one invocation: parse the raw body, validate it and build the
/// response envelope.
///
/// Never fails. A body that is not JSON of the expected shape, or that lacks
/// a `name`, is answered with a 400 response rather than an error.
pub fn handle(raw_body: &str) -> OutgoingResponse {
    info!("Request body is {}", raw_body);

    match parse_event(raw_body) {
        Ok(name) => OutgoingResponse::ok(greeting(&name)),
        Err(e) => {
            debug!(reason = %e.reason(), "Rejecting request: {}", e);
            OutgoingResponse::from(&e)
        }
    }
}

/// Parses the body and returns the validated, non-empty name.
///
/// A top-level JSON `null` decodes to an event without a name, so it is
/// reported as a missing field rather than malformed input.
pub fn parse_event(raw_body: &str) -> Result<String> {
    let event: Option<IncomingEvent> = serde_json::from_str(raw_body)?;

    match event.and_then(|e| e.name) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(GreeterError::missing("name")),
    }
}

pub fn greeting(name: &str) -> String {
    format!("Hello there, {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_response(raw_body: &str, status_code: u16, body: &str) {
        let response = handle(raw_body);
        assert_eq!(response.status_code, status_code, "status for {:?}", raw_body);
        assert_eq!(response.body, body, "body for {:?}", raw_body);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_handle_not_json() {
        assert_response("not json", 400, "Unable to unmarshal JSON");
    }

    #[test]
    fn test_handle_empty_body() {
        assert_response("", 400, "Unable to unmarshal JSON");
    }

    #[test]
    fn test_handle_truncated_object() {
        assert_response("{", 400, "Unable to unmarshal JSON");
    }

    #[test]
    fn test_handle_wrong_shape() {
        assert_response("[1, 2]", 400, "Unable to unmarshal JSON");
        assert_response(r#""World""#, 400, "Unable to unmarshal JSON");
        assert_response(r#"{"name": 42}"#, 400, "Unable to unmarshal JSON");
    }

    #[test]
    fn test_handle_missing_name() {
        assert_response("{}", 400, "Please provide a name");
    }

    #[test]
    fn test_handle_empty_name() {
        assert_response(r#"{"name":""}"#, 400, "Please provide a name");
    }

    #[test]
    fn test_handle_null_name_and_null_body() {
        assert_response(r#"{"name":null}"#, 400, "Please provide a name");
        assert_response("null", 400, "Please provide a name");
    }

    #[test]
    fn test_handle_greets_by_name() {
        assert_response(r#"{"name":"World"}"#, 200, "Hello there, World");
    }

    #[test]
    fn test_handle_ignores_extra_fields() {
        assert_response(r#"{"name":"Ada","extra":1}"#, 200, "Hello there, Ada");
    }

    #[test]
    fn test_handle_repeated_name_uses_last() {
        assert_response(r#"{"name":"a","name":"b"}"#, 200, "Hello there, b");
        assert_response(r#"{"name":"a","NAME":"b"}"#, 200, "Hello there, b");
        assert_response(r#"{"name":"a","name":""}"#, 400, "Please provide a name");
    }

    #[test]
    fn test_handle_name_key_any_case() {
        assert_response(r#"{"Name":"Ada"}"#, 200, "Hello there, Ada");
        assert_response(r#"{"NAME":"Ada"}"#, 200, "Hello there, Ada");
    }

    #[test]
    fn test_handle_lone_surrogate() {
        assert_response(r#"{"name":"\ud800"}"#, 200, "Hello there, \u{FFFD}");
    }

    #[test]
    fn test_handle_keeps_name_verbatim() {
        assert_response(r#"{"name":"  \"Bob\" <b>"}"#, 200, r#"Hello there,   "Bob" <b>"#);
    }

    #[test]
    fn test_parse_event_errors() {
        match parse_event("not json") {
            Err(GreeterError::MalformedInput { .. }) => {}
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
        match parse_event("{}") {
            Err(GreeterError::MissingField { field }) => assert_eq!(field, "name"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting("Ada"), "Hello there, Ada");
    }
}
