//! Mission API endpoints.
//!
//! - `POST /missions` - Create a mission with its targets
//! - `GET /missions` - List missions
//! - `GET /missions/:id` - Get a mission
//! - `DELETE /missions/:id` - Delete an unassigned mission
//! - `PUT /missions/:id/assign` - Assign a cat
//! - `PATCH /missions/:id/complete` - Mark a mission complete
//! - `POST /missions/:id/targets` - Add a target
//! - `GET /missions/targets/:target_id` - Get a target
//! - `PATCH /missions/targets/:target_id` - Update a target's notes or completion
//! - `DELETE /missions/targets/:target_id` - Delete a pending target

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use std::sync::Arc;

use super::error::{path_id, ApiError};
use super::routes::AppState;
use super::types::MessageResponse;
use crate::missions::{
    AssignCatRequest, CreateMissionRequest, CreateTargetRequest, Mission, Target,
    UpdateTargetRequest,
};

/// Create mission routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_missions).post(create_mission))
        .route("/:id", get(get_mission).delete(delete_mission))
        .route("/:id/assign", put(assign_cat))
        .route("/:id/complete", patch(complete_mission))
        .route("/:id/targets", post(add_target))
        .route(
            "/targets/:target_id",
            get(get_target).patch(update_target).delete(delete_target),
        )
}

async fn create_mission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Mission>), ApiError> {
    let Json(req) = payload.map_err(ApiError::invalid_json)?;
    req.validate()?;

    let (mission, targets) = req.into_parts();
    let mission = state
        .missions
        .create(mission, targets)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to create mission"))?;
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn list_missions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Mission>>, ApiError> {
    let missions = state
        .missions
        .list()
        .await
        .map_err(|e| ApiError::from_service(e, "failed to fetch missions"))?;
    Ok(Json(missions))
}

async fn get_mission(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Mission>, ApiError> {
    let id = path_id(path, "mission")?;
    state
        .missions
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to fetch mission"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("mission not found"))
}

async fn delete_mission(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "mission")?;
    state
        .missions
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to delete mission"))?;
    Ok(Json(MessageResponse::new("mission deleted")))
}

async fn assign_cat(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AssignCatRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "mission")?;
    let Json(req) = payload.map_err(ApiError::invalid_json)?;

    state
        .missions
        .assign_cat(id, req.cat_id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to assign cat"))?;
    Ok(Json(MessageResponse::new("cat assigned successfully")))
}

async fn complete_mission(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "mission")?;
    state
        .missions
        .mark_complete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to complete mission"))?;
    Ok(Json(MessageResponse::new("mission marked complete")))
}

async fn add_target(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateTargetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id = path_id(path, "mission")?;
    let Json(req) = payload.map_err(ApiError::invalid_json)?;
    req.validate()?;

    state
        .missions
        .add_target(id, req.into_new_target())
        .await
        .map_err(|e| ApiError::from_service(e, "failed to add target"))?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("target added"))))
}

async fn get_target(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Target>, ApiError> {
    let id = path_id(path, "target")?;
    state
        .missions
        .get_target(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to fetch target"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("target not found"))
}

async fn update_target(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTargetRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "target")?;
    let Json(req) = payload.map_err(ApiError::invalid_json)?;

    state
        .missions
        .update_target(id, req)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to update target"))?;
    Ok(Json(MessageResponse::new("target updated")))
}

async fn delete_target(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path, "target")?;
    state
        .missions
        .delete_target(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to delete target"))?;
    Ok(Json(MessageResponse::new("target deleted")))
}
