// Contact form pipeline: screen, validate, build the notification, dispatch.
// Nothing here outlives a single request.

pub mod handlers;
pub mod models;
pub mod notification;
pub mod validation;
