//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`ClientError::Api`]) and body decoding so the
//! backend implementation stays focused on request construction.

use serde_json::Value;

use crate::error::ClientError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`ClientError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`ClientError::Api`] with status code and
///   response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Value of the `Location` header, if present and readable.
pub fn location_header(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Read a response body as JSON.
///
/// Empty bodies become `Value::Null`; bodies that are not JSON are kept as
/// `Value::String` so callers can still inspect a bare URL.
pub async fn read_body(resp: reqwest::Response) -> Result<Value, ClientError> {
    let text = resp.text().await?;
    Ok(decode_body(&text))
}

/// Decode a body already read as text, with the rules of [`read_body`].
#[must_use]
pub fn decode_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
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
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(::http::Response::builder().status(status).body("").unwrap())
    }

    fn mock_response_with_header(status: u16, name: &str, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header(name, value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_header(429, "Retry-After", "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_missing_header() {
        let resp = mock_response(429);
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[tokio::test]
    async fn check_response_rate_limited() {
        let resp = mock_response_with_header(429, "Retry-After", "30");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::RateLimited {
                retry_after_secs: 30
            }
        ));
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let resp = mock_response(500);
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(201);
        assert!(check_response(resp).await.is_ok());
    }

    #[test]
    fn location_header_is_read() {
        let resp = mock_response_with_header(201, "Location", "/Evaluation/77");
        assert_eq!(location_header(&resp).as_deref(), Some("/Evaluation/77"));
        assert_eq!(location_header(&mock_response(201)), None);
    }

    #[test]
    fn decode_body_variants() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  {\"id\": 3} "), json!({"id": 3}));
        assert_eq!(
            decode_body("https://cdn.example.org/e/3.pdf"),
            json!("https://cdn.example.org/e/3.pdf")
        );
    }
}
