//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, 401/403 → [`GenAiError::Auth`], other non-success →
//! [`GenAiError::Api`]) so the client stays focused on request construction
//! and response mapping.

use crate::error::GenAiError;

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GenAiError> {
    let status = resp.status();
    if status == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(GenAiError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if status.is_success() {
        return Ok(resp);
    }

    let message = error_message(&resp.text().await.unwrap_or_default());
    if status == 401 || status == 403 {
        return Err(GenAiError::Auth {
            status: status.as_u16(),
            message,
        });
    }
    Err(GenAiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull `error.message` out of a provider error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_retry_after(429, "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_missing_header() {
        let resp = mock_response(429, "");
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"error":{"code":400,"message":"Invalid JSON payload","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "Invalid JSON payload");
        assert_eq!(error_message("  upstream exploded \n"), "upstream exploded");
    }

    #[tokio::test]
    async fn check_response_rate_limited_with_header() {
        let resp = mock_response_with_retry_after(429, "30");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            GenAiError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn check_response_auth_error() {
        let resp = mock_response(
            403,
            r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
        );
        let err = check_response(resp).await.unwrap_err();
        match err {
            GenAiError::Auth { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let resp = mock_response(500, "internal");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, GenAiError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "{}");
        assert!(check_response(resp).await.is_ok());
    }
}
