//! Live session handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use classgate_core::types::CourseId;
use classgate_entity::live::{LiveSessionStatus, MeetingProvider};
use classgate_service::ScheduleSession;

use crate::dto::request::{LiveStatusQuery, ScheduleRequest, SetStatusRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::path::parse_room_id;
use crate::extractors::{AuthUser, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// GET /live/status?roomId=
pub async fn get_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<LiveStatusQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room_id = parse_room_id(&query.room_id)?;
    let status = state.live_service.get_status(&auth, &room_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": status })))
}

/// POST /live/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room_id = parse_room_id(&req.room_id)?;
    let target: LiveSessionStatus = req.status.parse()?;
    let session = state.live_service.set_status(&auth, &room_id, target).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": session })))
}

/// POST /live/rooms
pub async fn schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ScheduleRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let course_id = req.course_id.as_deref().map(CourseId::parse).transpose()?;

    let session = state
        .live_service
        .schedule(
            &auth,
            ScheduleSession {
                title: req.title,
                provider: MeetingProvider::from(req.provider.as_str()),
                room_name: req.room_name,
                meeting_link: req.meeting_link,
                course_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": session })),
    ))
}

/// POST /live/rooms/{room_id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room_id = parse_room_id(&room_id)?;
    let session = state.live_service.cancel(&auth, &room_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": session })))
}

/// GET /live/rooms/{room_id}/view
pub async fn view(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<classgate_service::SessionView>>, ApiError> {
    let room_id = parse_room_id(&room_id)?;
    let view = state.view_gate.view(&auth, &room_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}
