//! Contact form relay for a personal portfolio site.
//!
//! One endpoint, `POST /api/contact`, screens a submission for spam, validates it and
//! forwards it to the site owner by email. `client` holds the matching form client.

pub mod client;
pub mod config;
pub mod contact;
pub mod errors;
pub mod mailer;
pub mod routes;
pub mod state;
