use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use healtharmy_core::models::volunteer::{
    CreateVolunteerRequest, CreateVolunteerResponse, MutationResponse, UpdateVolunteerData, Volunteer,
    VolunteerWithAvailability,
};
use std::sync::Arc;

use crate::{
    middleware::{auth::CurrentPrincipal, error_handling::AppError},
    ApiState,
};

/// Public registration form.
#[axum::debug_handler]
pub async fn create_volunteer(
    State(state): State<Arc<ApiState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    payload: Result<Json<CreateVolunteerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateVolunteerResponse>), AppError> {
    let Json(input) = payload?;
    let created = state.volunteers.register_volunteer(&principal, input).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn list_volunteers(
    State(state): State<Arc<ApiState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Json<Vec<Volunteer>>, AppError> {
    let volunteers = state.volunteers.list_volunteers(&principal).await?;
    Ok(Json(volunteers))
}

/// Responds with `null` when an admin asks for an unknown id.
#[axum::debug_handler]
pub async fn get_volunteer(
    State(state): State<Arc<ApiState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Option<VolunteerWithAvailability>>, AppError> {
    let Path(id) = id?;
    let volunteer = state.volunteers.get_volunteer(id, &principal).await?;
    Ok(Json(volunteer))
}

#[axum::debug_handler]
pub async fn update_volunteer(
    State(state): State<Arc<ApiState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateVolunteerData>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Path(id) = id?;
    let Json(data) = payload?;
    let response = state.volunteers.update_volunteer(id, data, &principal).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_volunteer(
    State(state): State<Arc<ApiState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Path(id) = id?;
    let response = state.volunteers.delete_volunteer(id, &principal).await?;
    Ok(Json(response))
}
