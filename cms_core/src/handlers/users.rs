//! Sign-in and sign-out handlers.

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{error::Result, pages, session::Session, AppState};

use super::redirect_found;

pub async fn signin_form(mut session: Session) -> Result<Response> {
    let message = session.take_message();
    let page = pages::signin("", message.as_deref(), session.username());
    Ok((session, Html(page)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn signin(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<SigninForm>,
) -> Result<Response> {
    if state.credentials.verify(&form.username, &form.password) {
        session.sign_in(&form.username);
        info!("user {} signed in", form.username);
        return Ok((session, redirect_found("/")).into_response());
    }

    warn!("failed sign-in attempt for {:?}", form.username);
    session.take_message();
    let page = pages::signin(
        &form.username,
        Some("Invalid credentials"),
        session.username(),
    );
    Ok((StatusCode::UNPROCESSABLE_ENTITY, session, Html(page)).into_response())
}

pub async fn signout(mut session: Session) -> Result<Response> {
    if let Some(username) = session.username() {
        info!("user {} signed out", username);
    }
    session.sign_out();
    Ok((session, redirect_found("/")).into_response())
}

#[cfg(test)]
mod tests {
    use crate::{
        auth::{CredentialVerifier, FixedCredentials},
        handlers::routes::create_routes,
        session::{SessionClaims, SessionCodec},
        store::DocumentStore,
        AppState,
    };
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
        Router,
    };
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn setup_test_state(temp: &TempDir) -> AppState {
        AppState {
            app_name: "File CMS".to_string(),
            version: "test".to_string(),
            store: DocumentStore::new(temp.path()),
            session_codec: SessionCodec::new(TEST_SECRET, "cms_session").unwrap(),
            credentials: Arc::new(FixedCredentials::new("admin", "secret")),
        }
    }

    fn test_app(state: &AppState) -> Router {
        create_routes().with_state(state.clone())
    }

    fn session_claims(state: &AppState, response: &Response) -> Option<SessionClaims> {
        let cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        let token = cookie.split(';').next()?.strip_prefix("cms_session=")?;
        state.session_codec.decode(token).ok()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn signin_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/users/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={username}&password={password}"
            )))
            .unwrap()
    }

    #[tokio::test]
    async fn test_signin_form_renders() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp);

        let request = Request::builder()
            .uri("/users/signin")
            .body(Body::empty())
            .unwrap();
        let response = test_app(&state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<input name=\"username\""));
        assert!(body.contains("<button type=\"submit\">Sign In</button>"));
    }

    #[tokio::test]
    async fn test_signin_with_valid_credentials() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp);

        let response = test_app(&state)
            .oneshot(signin_request("admin", "secret"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        let claims = session_claims(&state, &response).unwrap();
        assert_eq!(claims.username.as_deref(), Some("admin"));
        assert_eq!(claims.message.as_deref(), Some("Welcome admin!"));
    }

    #[tokio::test]
    async fn test_signin_with_bad_credentials() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp);

        let response = test_app(&state)
            .oneshot(signin_request("admin", "wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("Invalid credentials"));
        // The submitted username is carried back into the form.
        assert!(body.contains("value=\"admin\""));
    }

    #[tokio::test]
    async fn test_signout_clears_the_username() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp);

        let claims = SessionClaims {
            username: Some("admin".to_string()),
            ..SessionClaims::default()
        };
        let cookie = format!("cms_session={}", state.session_codec.encode(&claims).unwrap());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/users/signout")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = test_app(&state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let claims = session_claims(&state, &response).unwrap();
        assert_eq!(claims.username, None);
        assert_eq!(claims.message.as_deref(), Some("You have been signed out."));
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_treated_as_signed_out() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/new")
            .header(header::COOKIE, "cms_session=not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let response = test_app(&state).oneshot(request).await.unwrap();

        // The restricted page bounces the visitor exactly as if no cookie
        // had been sent at all.
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    struct AcceptEverything;

    impl CredentialVerifier for AcceptEverything {
        fn verify(&self, _username: &str, _password: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_substitute_credential_verifier_is_honored() {
        let temp = TempDir::new().unwrap();
        let state = setup_test_state(&temp).with_credentials(Arc::new(AcceptEverything));

        let response = test_app(&state)
            .oneshot(signin_request("guest", "anything"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let claims = session_claims(&state, &response).unwrap();
        assert_eq!(claims.username.as_deref(), Some("guest"));
    }
}
