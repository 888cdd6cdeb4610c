//! Live session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classgate_core::types::{CourseId, RoomId, UserId};

use super::provider::MeetingProvider;
use super::status::LiveSessionStatus;

/// A schedulable live meeting ("room"), optionally tied to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    /// Opaque, shareable identifier.
    pub room_id: RoomId,
    /// Display title.
    pub title: String,
    /// Current status.
    pub status: LiveSessionStatus,
    /// Meeting backend.
    pub provider: MeetingProvider,
    /// Room name used by embeddable providers.
    pub room_name: String,
    /// Stored link for externally hosted providers.
    pub meeting_link: Option<String>,
    /// Owning instructor.
    pub created_by: UserId,
    /// Course used for enrollment-based gating.
    pub course_id: Option<CourseId>,
    /// When the session was scheduled.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl LiveSession {
    /// Whether `user_id` owns this session.
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }
}

/// Input for scheduling a session.
#[derive(Debug, Clone)]
pub struct NewLiveSession {
    /// Identifier to assign.
    pub room_id: RoomId,
    /// Display title.
    pub title: String,
    /// Meeting backend.
    pub provider: MeetingProvider,
    /// Room name.
    pub room_name: String,
    /// External meeting link.
    pub meeting_link: Option<String>,
    /// Owning instructor.
    pub created_by: UserId,
    /// Linked course.
    pub course_id: Option<CourseId>,
}

impl NewLiveSession {
    /// Materialize the record in its initial `scheduled` state.
    pub fn into_session(self, now: DateTime<Utc>) -> LiveSession {
        LiveSession {
            room_id: self.room_id,
            title: self.title,
            status: LiveSessionStatus::Scheduled,
            provider: self.provider,
            room_name: self.room_name,
            meeting_link: self.meeting_link,
            created_by: self.created_by,
            course_id: self.course_id,
            created_at: now,
            updated_at: now,
        }
    }
}
