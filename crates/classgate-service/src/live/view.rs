//! Session view gate: what the room page should render.

use std::sync::Arc;

use serde::Serialize;

use classgate_core::config::LiveConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, RoomId};
use classgate_database::store::{CourseStore, LiveSessionStore};
use classgate_entity::live::{LiveSession, LiveSessionStatus};

use super::provider::ProviderAdapter;
use crate::access::AccessGate;
use crate::context::RequestContext;

/// Presentation chosen for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionView {
    /// Access denied; shown instead of the room whatever its status.
    EnrollmentRequired {
        /// Course to enroll in, when the session is course-linked.
        #[serde(skip_serializing_if = "Option::is_none")]
        course_id: Option<CourseId>,
    },
    /// Owner of a scheduled session.
    StartControl {
        /// Room to start.
        room_id: RoomId,
        /// Session title.
        title: String,
    },
    /// Non-owner of a scheduled session; re-check periodically.
    Waiting {
        /// Suggested re-check interval.
        poll_interval_seconds: u64,
    },
    /// The session is running.
    Room {
        /// Joinable URL.
        #[serde(skip_serializing_if = "Option::is_none")]
        room_url: Option<String>,
        /// Room name.
        room_name: String,
        /// Mount in-page or open externally.
        is_embeddable: bool,
    },
    /// The session finished.
    Ended {
        /// Link back to the related course.
        #[serde(skip_serializing_if = "Option::is_none")]
        course_link: Option<String>,
    },
    /// The session was called off.
    Cancelled {
        /// Link back to the related course.
        #[serde(skip_serializing_if = "Option::is_none")]
        course_link: Option<String>,
    },
}

/// Resolves a session, applies the access gate, and picks a presentation.
#[derive(Debug, Clone)]
pub struct SessionViewGate {
    sessions: Arc<dyn LiveSessionStore>,
    courses: Arc<dyn CourseStore>,
    gate: AccessGate,
    adapter: ProviderAdapter,
    config: LiveConfig,
}

impl SessionViewGate {
    /// Creates a new view gate.
    pub fn new(
        sessions: Arc<dyn LiveSessionStore>,
        courses: Arc<dyn CourseStore>,
        gate: AccessGate,
        adapter: ProviderAdapter,
        config: LiveConfig,
    ) -> Self {
        Self {
            sessions,
            courses,
            gate,
            adapter,
            config,
        }
    }

    /// Presentation of `room_id` for the caller.
    pub async fn view(&self, ctx: &RequestContext, room_id: &RoomId) -> AppResult<SessionView> {
        let session = self
            .sessions
            .find_by_room_id(room_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Live session '{room_id}' not found")))?;

        if !self.gate.can_view(ctx.user_id, &session).await? {
            return Ok(SessionView::EnrollmentRequired {
                course_id: session.course_id,
            });
        }

        let view = match session.status {
            LiveSessionStatus::Scheduled if session.is_owner(ctx.user_id) => SessionView::StartControl {
                room_id: session.room_id.clone(),
                title: session.title.clone(),
            },
            LiveSessionStatus::Scheduled => SessionView::Waiting {
                poll_interval_seconds: self.config.poll_interval_seconds,
            },
            LiveSessionStatus::Active => {
                let room = self.adapter.resolve_session(&session);
                SessionView::Room {
                    room_url: room.room_url,
                    room_name: session.room_name.clone(),
                    is_embeddable: room.is_embeddable,
                }
            }
            LiveSessionStatus::Ended => SessionView::Ended {
                course_link: self.course_link(&session).await?,
            },
            LiveSessionStatus::Cancelled => SessionView::Cancelled {
                course_link: self.course_link(&session).await?,
            },
        };
        Ok(view)
    }

    async fn course_link(&self, session: &LiveSession) -> AppResult<Option<String>> {
        let Some(course_id) = session.course_id else {
            return Ok(None);
        };
        let base = self.config.course_base_url.trim_end_matches('/');
        let link = match self.courses.find_by_id(course_id).await? {
            Some(course) => format!("{base}/{}", course.slug),
            None => format!("{base}/{course_id}"),
        };
        Ok(Some(link))
    }
}
