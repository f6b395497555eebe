//! HTTP route handlers.

pub mod documents;
pub mod routes;
pub mod users;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// A `302 Found` redirect. `axum::response::Redirect` only offers 303/307/308,
/// and every redirect in this app is a plain 302.
pub(crate) fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
