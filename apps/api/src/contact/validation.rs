use crate::contact::models::{ContactRequest, Screening, Submission};
use crate::errors::AppError;

pub const MISSING_FIELDS_MESSAGE: &str = "Name, email, and message are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";

/// Spam check. Any non-empty honeypot value marks the submission as spam,
/// whatever the other fields contain.
pub fn screen(request: ContactRequest) -> Screening {
    if request.honeypot.as_deref().is_some_and(|v| !v.is_empty()) {
        Screening::Spam
    } else {
        Screening::Candidate(request)
    }
}

/// Validates a candidate submission.
///
/// Order matters: the required-field check runs before the email shape check,
/// so a request missing its name never reports an email problem.
pub fn validate(request: &ContactRequest) -> Result<Submission, AppError> {
    let (Some(name), Some(email), Some(message)) = (
        non_blank(request.name.as_deref()),
        non_blank(request.email.as_deref()),
        non_blank(request.message.as_deref()),
    ) else {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    };

    // Blank-ness is judged on the trimmed text; the email shape on the text as sent.
    if !is_valid_email(email) {
        return Err(AppError::Validation(INVALID_EMAIL_MESSAGE.to_string()));
    }

    Ok(Submission {
        name: name.trim().to_string(),
        email: email.to_string(),
        phone: non_blank(request.phone.as_deref()).map(str::to_string),
        message: message.to_string(),
    })
}

/// Accepts `local@domain.tld`: one `@`, no whitespace, and a `.` in the domain
/// with at least one character on either side of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Returns the value untouched unless it is absent or whitespace only.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(String::new()),
            message: Some(message.to_string()),
            honeypot: Some(String::new()),
        }
    }

    fn validation_message(result: Result<Submission, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_filled_honeypot_is_spam() {
        let mut req = request("Bot", "not-an-email", "");
        req.honeypot = Some("http://spam.example".to_string());
        assert_eq!(screen(req), Screening::Spam);
    }

    #[test]
    fn test_whitespace_honeypot_is_spam() {
        let mut req = request("Jane Doe", "jane@example.com", "Hello");
        req.honeypot = Some(" ".to_string());
        assert_eq!(screen(req), Screening::Spam);
    }

    #[test]
    fn test_empty_or_missing_honeypot_is_candidate() {
        let req = request("Jane Doe", "jane@example.com", "Hello");
        assert!(matches!(screen(req.clone()), Screening::Candidate(_)));

        let mut no_honeypot = req;
        no_honeypot.honeypot = None;
        assert!(matches!(screen(no_honeypot), Screening::Candidate(_)));
    }

    #[test]
    fn test_valid_submission() {
        let submission = validate(&request("Jane Doe", "jane@example.com", "Hello")).unwrap();
        assert_eq!(submission.name, "Jane Doe");
        assert_eq!(submission.email, "jane@example.com");
        assert_eq!(submission.phone, None);
        assert_eq!(submission.message, "Hello");
    }

    #[test]
    fn test_phone_is_kept_when_present() {
        let mut req = request("Jane Doe", "jane@example.com", "Hello");
        req.phone = Some("+1 555 0100".to_string());
        assert_eq!(
            validate(&req).unwrap().phone.as_deref(),
            Some("+1 555 0100")
        );
    }

    #[test]
    fn test_missing_name() {
        let msg = validation_message(validate(&request("", "jane@example.com", "Hello")));
        assert_eq!(msg, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_missing_message() {
        let msg = validation_message(validate(&request("Jane", "jane@example.com", "")));
        assert_eq!(msg, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_absent_email() {
        let mut req = request("Jane", "", "Hello");
        req.email = None;
        assert_eq!(validation_message(validate(&req)), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_whitespace_only_name_counts_as_missing() {
        let msg = validation_message(validate(&request("   ", "jane@example.com", "Hello")));
        assert_eq!(msg, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_missing_fields_reported_before_bad_email() {
        let msg = validation_message(validate(&request("", "nonsense", "Hello")));
        assert_eq!(msg, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_bad_email_reported() {
        let msg = validation_message(validate(&request("Jane", "jane.example.com", "Hello")));
        assert_eq!(msg, INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn test_message_is_kept_as_written() {
        let submission =
            validate(&request("Jane", "jane@example.com", "  indented\ncode\n\n")).unwrap();
        assert_eq!(submission.message, "  indented\ncode\n\n");
    }

    #[test]
    fn test_padded_email_is_rejected() {
        for email in [" jane@example.com", "jane@example.com\n", "\tjane@example.com "] {
            let msg = validation_message(validate(&request("Jane", email, "Hello")));
            assert_eq!(msg, INVALID_EMAIL_MESSAGE, "email {email:?}");
        }
    }

    #[test]
    fn test_whitespace_only_email_counts_as_missing() {
        let msg = validation_message(validate(&request("Jane", "  ", "Hello")));
        assert_eq!(msg, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_email_shapes_accepted() {
        for email in [
            "jane@example.com",
            "a@b.c",
            "first.last+tag@sub.example.co.uk",
            "jane@localhost.localdomain",
            "jane@exa.mple.",
        ] {
            assert!(is_valid_email(email), "expected {email} to be accepted");
        }
    }

    #[test]
    fn test_email_shapes_rejected() {
        for email in [
            "",
            "jane",
            "jane@",
            "@example.com",
            "jane@example",
            "jane@.com",
            "jane@com.",
            "jane@@example.com",
            "jane@exa@mple.com",
            "jane doe@example.com",
            "jane@example .com",
            "jane\t@example.com",
        ] {
            assert!(!is_valid_email(email), "expected {email:?} to be rejected");
        }
    }
}
