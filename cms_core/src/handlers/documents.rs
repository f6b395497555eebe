//! Document CRUD handlers.

use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::Result,
    pages,
    render::render_markdown,
    session::Session,
    store::DocumentKind,
    validation::validate_filename,
    AppState,
};

use super::redirect_found;

const SIGNIN_REQUIRED: &str = "You must be signed in to do that.";

/// Bounces a signed-out visitor back to the index with a flash.
fn deny_signed_out(mut session: Session) -> Response {
    session.set_message(SIGNIN_REQUIRED);
    (session, redirect_found("/")).into_response()
}

pub async fn index(State(state): State<AppState>, mut session: Session) -> Result<Response> {
    let names = state.store.list().await?;

    let message = session.take_message();
    let page = pages::index(&names, message.as_deref(), session.username());
    Ok((session, Html(page)).into_response())
}

pub async fn view_document(
    State(state): State<AppState>,
    mut session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    let content = match state.store.read(&filename).await {
        Ok(content) => content,
        Err(err) if err.is_not_found() => {
            session.set_message(format!("{filename} does not exist."));
            return Ok((session, redirect_found("/")).into_response());
        }
        Err(err) => return Err(err),
    };

    // A name with an unrecognized extension can pass validation (the rule is
    // substring containment), so fall back to serving it as plain text.
    let kind = DocumentKind::from_name(&filename).unwrap_or(DocumentKind::PlainText);
    let content_type = kind.content_type();

    match kind {
        DocumentKind::Markdown => {
            let fragment = render_markdown(&content);
            let message = session.take_message();
            let page =
                pages::markdown_page(&filename, &fragment, message.as_deref(), session.username());
            Ok((session, [(header::CONTENT_TYPE, content_type.as_ref())], page).into_response())
        }
        DocumentKind::PlainText => {
            Ok(([(header::CONTENT_TYPE, content_type.as_ref())], content).into_response())
        }
    }
}

pub async fn new_document_form(mut session: Session) -> Result<Response> {
    if !session.is_signed_in() {
        return Ok(deny_signed_out(session));
    }

    let message = session.take_message();
    let page = pages::new_document(message.as_deref(), session.username());
    Ok((session, Html(page)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentForm {
    #[serde(default)]
    pub filename: String,
}

pub async fn create_document(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CreateDocumentForm>,
) -> Result<Response> {
    if !session.is_signed_in() {
        return Ok(deny_signed_out(session));
    }

    if let Err(reason) = validate_filename(&form.filename) {
        // The form re-renders with the error inline, so any pending flash
        // is consumed here rather than carried to the next page.
        session.take_message();
        let page = pages::new_document(Some(&reason.to_string()), session.username());
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, session, Html(page)).into_response());
    }

    state.store.write(&form.filename, "").await?;
    info!("created document {}", form.filename);

    session.set_message(format!("{} has been created.", form.filename));
    Ok((session, redirect_found("/")).into_response())
}

pub async fn edit_document_form(
    State(state): State<AppState>,
    mut session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    if !session.is_signed_in() {
        return Ok(deny_signed_out(session));
    }

    let content = match state.store.read(&filename).await {
        Ok(content) => content,
        Err(err) if err.is_not_found() => {
            session.set_message(format!("{filename} does not exist."));
            return Ok((session, redirect_found("/")).into_response());
        }
        Err(err) => return Err(err),
    };

    let message = session.take_message();
    let page = pages::edit_document(&filename, &content, message.as_deref(), session.username());
    Ok((session, Html(page)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentForm {
    #[serde(default)]
    pub content: String,
}

pub async fn update_document(
    State(state): State<AppState>,
    mut session: Session,
    Path(filename): Path<String>,
    Form(form): Form<UpdateDocumentForm>,
) -> Result<Response> {
    if !session.is_signed_in() {
        return Ok(deny_signed_out(session));
    }

    match state.store.write(&filename, &form.content).await {
        Ok(()) => {
            info!("updated document {}", filename);
            session.set_message(format!("{filename} has been updated"));
        }
        Err(err) if err.is_not_found() => {
            session.set_message(format!("{filename} does not exist."));
        }
        Err(err) => return Err(err),
    }

    Ok((session, redirect_found("/")).into_response())
}

pub async fn delete_document(
    State(state): State<AppState>,
    mut session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    if !session.is_signed_in() {
        return Ok(deny_signed_out(session));
    }

    match state.store.delete(&filename).await {
        Ok(()) => {
            info!("deleted document {}", filename);
            session.set_message(format!("{filename} has been deleted."));
        }
        Err(err) if err.is_not_found() => {
            session.set_message(format!("{filename} does not exist."));
        }
        Err(err) => return Err(err),
    }

    Ok((session, redirect_found("/")).into_response())
}
