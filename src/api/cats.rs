//! Cat API endpoints.
//!
//! - `POST /cats` - Hire a cat (breed checked against the registry)
//! - `GET /cats` - List cats
//! - `GET /cats/:id` - Get a cat
//! - `PATCH /cats/:id/salary` - Update a cat's salary
//! - `DELETE /cats/:id` - Remove a cat

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use std::sync::Arc;

use super::error::{path_id, ApiError};
use super::routes::AppState;
use super::types::{CreatedResponse, MessageResponse};
use crate::cats::{Cat, CreateCatRequest, UpdateSalaryRequest};

/// Create cat routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_cats).post(create_cat))
        .route("/:id", get(get_cat).delete(delete_cat))
        .route("/:id/salary", patch(update_salary))
}

async fn create_cat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(req) = payload.map_err(ApiError::invalid_json)?;
    req.validate()?;

    let id = state
        .cats
        .create(req.into_new_cat())
        .await
        .map_err(|e| ApiError::from_service(e, "failed to create cat"))?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn list_cats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Cat>>, ApiError> {
    let cats = state
        .cats
        .list()
        .await
        .map_err(|e| ApiError::from_service(e, "failed to get cats"))?;
    Ok(Json(cats))
}

async fn get_cat(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Cat>, ApiError> {
    let id = path_id(path, "cat")?;
    state
        .cats
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to get cat"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("cat not found with id {}", id)))
}

async fn update_salary(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSalaryRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "cat")?;
    let Json(req) = payload.map_err(ApiError::invalid_json)?;
    req.validate()?;

    state
        .cats
        .update_salary(id, req.salary)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to update salary"))?;
    Ok(Json(MessageResponse::new("salary updated successfully")))
}

async fn delete_cat(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "cat")?;
    state
        .cats
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to delete cat"))?;
    Ok(Json(MessageResponse::new("cat deleted")))
}
