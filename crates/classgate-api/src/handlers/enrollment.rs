//! Enrollment and moderation handlers.

use axum::Json;
use axum::extract::{Path, State};

use classgate_service::CourseRef;

use crate::dto::request::{EnrollRequest, ReviewRequest};
use crate::dto::response::EnrollResponse;
use crate::error::ApiError;
use crate::extractors::path::parse_enrollment_id;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /enrollments/enroll
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<EnrollRequest>,
) -> Result<Json<EnrollResponse>, ApiError> {
    let course_ref = CourseRef::from_parts(req.course_id.as_deref(), req.course_slug.as_deref())?;

    let outcome = state
        .enrollment_service
        .enroll(&auth, &course_ref, req.manual_enrollment)
        .await?;

    Ok(Json(EnrollResponse::from(outcome)))
}

/// GET /enrollments/me
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let enrollments = state.enrollment_service.list_mine(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": enrollments })))
}

/// POST /enrollments/{enrollment_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ReviewRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_enrollment_id(&enrollment_id)?;
    let enrollment = state
        .moderation_service
        .approve(&auth, id, req.note.as_deref())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": enrollment })))
}

/// POST /enrollments/{enrollment_id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ReviewRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_enrollment_id(&enrollment_id)?;
    let enrollment = state
        .moderation_service
        .reject(&auth, id, req.note.as_deref())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": enrollment })))
}
