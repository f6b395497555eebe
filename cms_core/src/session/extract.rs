use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};

use super::codec::{SessionClaims, SessionCodec};
use crate::error::AppError;
use crate::AppState;

/// Session context handed to every handler.
///
/// Extraction reads and verifies the session cookie; a missing or tampered
/// cookie silently yields a fresh signed-out session. Returning the session
/// as part of the response (`(session, body)`) re-signs the claims into a
/// `Set-Cookie` header, which is how sign-in state and flash messages
/// persist across requests.
#[derive(Clone)]
pub struct Session {
    claims: SessionClaims,
    codec: SessionCodec,
}

impl Session {
    pub fn new(codec: SessionCodec) -> Self {
        Self {
            claims: SessionClaims::default(),
            codec,
        }
    }

    pub fn from_claims(claims: SessionClaims, codec: SessionCodec) -> Self {
        Self { claims, codec }
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.username.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.claims.username.is_some()
    }

    pub fn sign_in(&mut self, username: &str) {
        self.claims.username = Some(username.to_string());
        self.claims.message = Some(format!("Welcome {}!", username));
    }

    pub fn sign_out(&mut self) {
        self.claims.username = None;
        self.claims.message = Some("You have been signed out.".to_string());
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.claims.message = Some(message.into());
    }

    /// One-shot read: the render that shows the flash message also clears it.
    pub fn take_message(&mut self) -> Option<String> {
        self.claims.message.take()
    }

    fn cookie_header_value(&self) -> Result<HeaderValue, AppError> {
        let token = self.codec.encode(&self.claims)?;
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.codec.cookie_name(),
            token
        );

        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Session(format!("invalid cookie value: {}", e)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let codec = state.session_codec.clone();

        let claims = cookie_value(&parts.headers, codec.cookie_name())
            .and_then(|token| codec.decode(&token).ok())
            .unwrap_or_default();

        Ok(Session { claims, codec })
    }
}

impl IntoResponseParts for Session {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let value = self.cookie_header_value()?;
        res.headers_mut().append(header::SET_COOKIE, value);
        Ok(res)
    }
}

/// Finds a cookie by name in the request headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn codec() -> SessionCodec {
        SessionCodec::new("0123456789abcdef0123456789abcdef", "cms_session").unwrap()
    }

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; cms_session=token123; lang=en".parse().unwrap(),
        );

        assert_eq!(
            cookie_value(&headers, "cms_session"),
            Some("token123".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_handles_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, "cms_session"), None);
    }

    #[test]
    fn sign_in_sets_username_and_welcome_flash() {
        let mut session = Session::new(codec());
        assert!(!session.is_signed_in());

        session.sign_in("admin");
        assert!(session.is_signed_in());
        assert_eq!(session.username(), Some("admin"));
        assert_eq!(session.take_message().as_deref(), Some("Welcome admin!"));
    }

    #[test]
    fn sign_out_clears_username_and_sets_goodbye_flash() {
        let mut session = Session::new(codec());
        session.sign_in("admin");
        session.take_message();

        session.sign_out();
        assert!(!session.is_signed_in());
        assert_eq!(
            session.take_message().as_deref(),
            Some("You have been signed out.")
        );
    }

    #[test]
    fn take_message_is_one_shot() {
        let mut session = Session::new(codec());
        session.set_message("test.txt has been created.");

        assert_eq!(
            session.take_message().as_deref(),
            Some("test.txt has been created.")
        );
        assert_eq!(session.take_message(), None);
    }

    #[test]
    fn session_round_trips_through_the_set_cookie_header() {
        let codec = codec();
        let mut session = Session::new(codec.clone());
        session.sign_in("admin");

        let response = (session, "body").into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        assert!(set_cookie.starts_with("cms_session="));
        assert!(set_cookie.contains("HttpOnly"));

        let token = set_cookie
            .trim_start_matches("cms_session=")
            .split(';')
            .next()
            .unwrap();
        let claims = codec.decode(token).unwrap();
        assert_eq!(claims.username.as_deref(), Some("admin"));
        assert_eq!(claims.message.as_deref(), Some("Welcome admin!"));
    }
}
