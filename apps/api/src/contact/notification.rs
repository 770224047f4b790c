use chrono::{DateTime, Utc};

use crate::contact::models::Submission;

const PHONE_NOT_PROVIDED: &str = "Not provided";

/// The owner-facing email produced for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Sender details, used as the Reply-To of the outgoing email.
    pub reply_name: String,
    pub reply_email: String,
}

pub fn build_notification(submission: &Submission, received_at: DateTime<Utc>) -> Notification {
    let phone = submission.phone.as_deref().unwrap_or(PHONE_NOT_PROVIDED);
    let received = received_at.to_rfc2822();

    let text_body = format!(
        "Name: {}\nEmail: {}\nPhone: {}\nReceived: {}\n\nMessage:\n{}",
        submission.name, submission.email, phone, received, submission.message
    );

    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">New Contact Form Submission</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Phone:</strong> {phone}</p>
  <p><strong>Received:</strong> {received}</p>
  <p><strong>Message:</strong></p>
  <div style="background-color: #f5f5f5; padding: 15px; border-radius: 5px;">
    {message}
  </div>
  <p style="color: #777; font-size: 12px; margin-top: 20px;">
    This email was sent from your portfolio website contact form.
  </p>
</div>"#,
        name = ammonia::clean_text(&submission.name),
        email = ammonia::clean_text(&submission.email),
        phone = ammonia::clean_text(phone),
        received = ammonia::clean_text(&received),
        message = message_to_html(&submission.message),
    );

    Notification {
        subject: format!("New Contact Form Submission from {}", submission.name),
        text_body,
        html_body,
        reply_name: submission.name.clone(),
        reply_email: submission.email.clone(),
    }
}

/// Escapes each line on its own and joins them with `<br>`, so user text can
/// never inject markup while its line breaks still render.
fn message_to_html(message: &str) -> String {
    message
        .split('\n')
        .map(|line| ammonia::clean_text(line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Vec<_>>()
        .join("<br>")
}
