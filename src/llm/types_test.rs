use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_code_unsupported_provider() {
    let err = LlmError::UnsupportedProvider("claude".into());
    assert_eq!(err.error_code(), "E_UNSUPPORTED_PROVIDER");
    assert_eq!(err.to_string(), "unsupported provider: claude");
}

#[test]
fn error_code_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "OPENAI_API_KEY".into() };
    assert_eq!(err.error_code(), "E_MISSING_API_KEY");
}

#[test]
fn error_code_api_parse() {
    let err = LlmError::ApiParse("json".into());
    assert_eq!(err.error_code(), "E_API_PARSE");
}

#[test]
fn provider_init_wraps_source_in_message() {
    let err = LlmError::ProviderInit {
        provider: ProviderKind::Gemini,
        source: Box::new(LlmError::MissingApiKey { var: "GOOGLE_API_KEY".into() }),
    };
    assert_eq!(err.error_code(), "E_PROVIDER_INIT");
    let msg = err.to_string();
    assert!(msg.contains("gemini"));
    assert!(msg.contains("GOOGLE_API_KEY"));
    assert!(std::error::Error::source(&err).is_some());
}

// =============================================================================
// LlmError::retryable
// =============================================================================

#[test]
fn retryable_api_request() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
}

#[test]
fn retryable_api_response_429_and_5xx() {
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!LlmError::ApiResponse { status: 401, body: "unauthorized".into() }.retryable());
    assert!(!LlmError::MissingApiKey { var: "K".into() }.retryable());
    assert!(!LlmError::ApiParse("bad".into()).retryable());
}

// =============================================================================
// Message
// =============================================================================

#[test]
fn user_message_sets_role() {
    let msg = Message::user("hello");
    assert_eq!(msg.role, "user");
    assert_eq!(msg.content, "hello");
}
