//! Route table for the CMS.

use crate::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::{documents, users};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::index))
        .route("/health", get(handle_health))
        .route("/new", get(documents::new_document_form))
        .route("/create", post(documents::create_document))
        .route("/users/signin", get(users::signin_form).post(users::signin))
        .route("/users/signout", post(users::signout))
        .route(
            "/:filename",
            get(documents::view_document).post(documents::update_document),
        )
        .route("/:filename/edit", get(documents::edit_document_form))
        .route("/:filename/delete", post(documents::delete_document))
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let documents = state.store.list().await.map(|names| names.len()).ok();

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "app": state.app_name,
        "version": state.version,
        "documents": documents,
    }))
}
