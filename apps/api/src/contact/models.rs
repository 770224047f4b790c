use serde::{Deserialize, Serialize};

/// Contact form payload as posted by the browser. Every field may be absent or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    /// Hidden field; only automated senders fill it in.
    pub honeypot: Option<String>,
}

/// A candidate submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// Outcome of the spam check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    Spam,
    Candidate(ContactRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_missing_and_null_fields() {
        let json = serde_json::json!({
            "name": "Jane Doe",
            "email": null,
            "message": "Hello"
        });
        let request: ContactRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.name.as_deref(), Some("Jane Doe"));
        assert!(request.email.is_none());
        assert!(request.phone.is_none());
        assert!(request.honeypot.is_none());
    }

    #[test]
    fn test_request_ignores_unknown_fields() {
        let json = serde_json::json!({ "name": "Jane", "subscribe": true });
        let request: ContactRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_request_rejects_non_string_field() {
        let json = serde_json::json!({ "name": 42 });
        assert!(serde_json::from_value::<ContactRequest>(json).is_err());
    }

    #[test]
    fn test_response_serializes_success_shape() {
        let value = serde_json::to_value(ContactResponse::ok("Thanks")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "success": true, "message": "Thanks" })
        );
    }
}
