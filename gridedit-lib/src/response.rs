//! Persistence endpoint response

use serde::Deserialize;

/// A successful (2xx) answer from the persistence endpoint.
///
/// The endpoint replies with `{"message": "..."}` when the change was applied
/// and `{"error": "..."}` when it could not apply it, both with a success
/// status. Either field is kept when present; a body that is not JSON leaves
/// both empty.
///
/// # Example
///
/// ```
/// use gridedit_lib::ApplyResponse;
///
/// let response = ApplyResponse::from_body(200, r#"{"error": "no such column"}"#);
/// assert!(response.is_rejected());
/// assert_eq!(response.error.as_deref(), Some("no such column"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyResponse {
    /// HTTP status code.
    pub status: u16,
    /// Confirmation message, if the endpoint sent one.
    pub message: Option<String>,
    /// Error reported by the endpoint despite the success status.
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApplyResponse {
    /// Creates a response from a status code and raw body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: ResponseBody = serde_json::from_str(body).unwrap_or_default();
        Self {
            status,
            message: parsed.message,
            error: parsed.error,
        }
    }

    /// Returns `true` if the endpoint said it could not apply the change.
    pub fn is_rejected(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_body() {
        let response = ApplyResponse::from_body(200, r#"{"message": "updated"}"#);
        assert_eq!(response.status, 200);
        assert_eq!(response.message.as_deref(), Some("updated"));
        assert!(!response.is_rejected());
    }

    #[test]
    fn test_non_json_body() {
        let response = ApplyResponse::from_body(204, "");
        assert_eq!(
            response,
            ApplyResponse {
                status: 204,
                message: None,
                error: None
            }
        );

        let response = ApplyResponse::from_body(200, "<html>ok</html>");
        assert!(response.message.is_none());
    }
}
