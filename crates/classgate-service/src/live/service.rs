//! Live session state machine.
//!
//! Status moves `scheduled -> active -> ended`, with `cancelled`
//! reachable from either non-terminal state. Start and end are
//! owner-only; cancel additionally admits moderators. Every write is a
//! compare-and-set on the stored status, and a lost race is re-evaluated
//! against the fresh state.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, RoomId};
use classgate_database::store::{CourseStore, LiveSessionStore};
use classgate_entity::live::{LiveSession, LiveSessionStatus, MeetingProvider, NewLiveSession};

use super::provider::ProviderAdapter;
use crate::access::AccessGate;
use crate::context::RequestContext;

/// Attempts before a contended transition gives up.
const MAX_CAS_ATTEMPTS: usize = 5;

const ROOM_NAME_MAX_LEN: usize = 128;
const TITLE_MAX_LEN: usize = 200;
const DEFAULT_TITLE: &str = "Live session";

/// Input for scheduling a session.
#[derive(Debug, Clone)]
pub struct ScheduleSession {
    /// Display title.
    pub title: Option<String>,
    /// Meeting backend.
    pub provider: MeetingProvider,
    /// Room name; generated when absent.
    pub room_name: Option<String>,
    /// Link for externally hosted providers.
    pub meeting_link: Option<String>,
    /// Course gating access.
    pub course_id: Option<CourseId>,
}

/// What a status read returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusView {
    /// Current status.
    pub status: LiveSessionStatus,
    /// Joinable URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_url: Option<String>,
    /// Room name.
    pub room_name: String,
    /// Whether the room can be embedded in-page.
    pub is_embeddable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    End,
    Cancel,
}

impl Command {
    fn verb(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::End => "ended",
            Self::Cancel => "cancelled",
        }
    }

    /// Target status from `current`, or `None` for a no-op.
    fn plan(self, current: LiveSessionStatus) -> AppResult<Option<LiveSessionStatus>> {
        use LiveSessionStatus::*;
        let next = match (self, current) {
            (Self::Start, Scheduled) => Some(Active),
            (Self::Start, Active) => None,
            (Self::End, Active) => Some(Ended),
            (Self::End, Scheduled) => Some(Cancelled),
            (Self::Cancel, Scheduled | Active) => Some(Cancelled),
            (_, Ended | Cancelled) => {
                return Err(AppError::conflict(format!(
                    "Session is already {current} and cannot be {}",
                    self.verb()
                )));
            }
        };
        debug_assert!(next.is_none_or(|n| current.can_transition_to(n)));
        Ok(next)
    }
}

/// Schedules live sessions and drives their status.
#[derive(Debug, Clone)]
pub struct LiveSessionService {
    sessions: Arc<dyn LiveSessionStore>,
    courses: Arc<dyn CourseStore>,
    gate: AccessGate,
    adapter: ProviderAdapter,
}

impl LiveSessionService {
    /// Creates a new live session service.
    pub fn new(
        sessions: Arc<dyn LiveSessionStore>,
        courses: Arc<dyn CourseStore>,
        gate: AccessGate,
        adapter: ProviderAdapter,
    ) -> Self {
        Self {
            sessions,
            courses,
            gate,
            adapter,
        }
    }

    /// Schedule a new session owned by the caller.
    pub async fn schedule(&self, ctx: &RequestContext, req: ScheduleSession) -> AppResult<LiveSession> {
        if !ctx.role.can_host_sessions() {
            return Err(AppError::forbidden("Only instructors can schedule live sessions"));
        }

        let title = match req.title.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_TITLE.to_string(),
            Some(t) if t.chars().count() > TITLE_MAX_LEN => {
                return Err(AppError::invalid_input("Title is too long"));
            }
            Some(t) => t.to_string(),
        };

        let meeting_link = req
            .meeting_link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        let link_is_http = |l: &String| l.starts_with("https://") || l.starts_with("http://");
        if meeting_link.as_ref().is_some_and(|l| !link_is_http(l)) {
            return Err(AppError::invalid_input("meetingLink must be an http(s) URL"));
        }
        if !req.provider.is_embeddable() && meeting_link.is_none() {
            return Err(AppError::invalid_input(format!(
                "Provider '{}' requires a meetingLink",
                req.provider
            )));
        }

        if let Some(course_id) = req.course_id {
            if self.courses.find_by_id(course_id).await?.is_none() {
                return Err(AppError::not_found(format!("Course {course_id} not found")));
            }
        }

        let room_id = RoomId::generate();
        let room_name = match req.room_name {
            Some(name) => validate_room_name(&name)?,
            None => format!("classgate-{room_id}"),
        };

        let session = self
            .sessions
            .create(NewLiveSession {
                room_id,
                title,
                provider: req.provider,
                room_name,
                meeting_link,
                created_by: ctx.user_id,
                course_id: req.course_id,
            })
            .await?;

        info!(
            room_id = %session.room_id,
            owner_id = %ctx.user_id,
            provider = %session.provider,
            "Live session scheduled"
        );
        Ok(session)
    }

    /// Start a scheduled session. Starting an active session is a no-op.
    pub async fn start(&self, ctx: &RequestContext, room_id: &RoomId) -> AppResult<LiveSession> {
        self.apply(ctx, room_id, Command::Start).await
    }

    /// End an active session, or call off one that never started.
    pub async fn end(&self, ctx: &RequestContext, room_id: &RoomId) -> AppResult<LiveSession> {
        self.apply(ctx, room_id, Command::End).await
    }

    /// Cancel a scheduled or active session. Owner or moderator.
    pub async fn cancel(&self, ctx: &RequestContext, room_id: &RoomId) -> AppResult<LiveSession> {
        self.apply(ctx, room_id, Command::Cancel).await
    }

    /// Drive the session toward `target` (`active` or `ended`).
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        room_id: &RoomId,
        target: LiveSessionStatus,
    ) -> AppResult<LiveSession> {
        match target {
            LiveSessionStatus::Active => self.start(ctx, room_id).await,
            LiveSessionStatus::Ended => self.end(ctx, room_id).await,
            other => Err(AppError::invalid_input(format!(
                "Status '{other}' cannot be requested; use 'active' or 'ended'"
            ))),
        }
    }

    /// Current status and joinable room, for callers passing the access gate.
    pub async fn get_status(&self, ctx: &RequestContext, room_id: &RoomId) -> AppResult<SessionStatusView> {
        let session = self.load(room_id).await?;
        if !self.gate.can_view(ctx.user_id, &session).await? {
            return Err(AppError::forbidden("Enrollment required to view this session"));
        }
        let room = self.adapter.resolve_session(&session);
        Ok(SessionStatusView {
            status: session.status,
            room_url: room.room_url,
            room_name: session.room_name,
            is_embeddable: room.is_embeddable,
        })
    }

    async fn load(&self, room_id: &RoomId) -> AppResult<LiveSession> {
        self.sessions
            .find_by_room_id(room_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Live session '{room_id}' not found")))
    }

    fn authorize(ctx: &RequestContext, session: &LiveSession, cmd: Command) -> AppResult<()> {
        let allowed = session.is_owner(ctx.user_id) || (cmd == Command::Cancel && ctx.is_moderator());
        if allowed {
            Ok(())
        } else {
            Err(AppError::forbidden("Only the session owner can change its status"))
        }
    }

    async fn apply(&self, ctx: &RequestContext, room_id: &RoomId, cmd: Command) -> AppResult<LiveSession> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let session = self.load(room_id).await?;
            Self::authorize(ctx, &session, cmd)?;

            let Some(next) = cmd.plan(session.status)? else {
                return Ok(session);
            };

            let now = Utc::now();
            if self
                .sessions
                .compare_and_set_status(room_id, session.status, next, now)
                .await?
            {
                info!(
                    room_id = %room_id,
                    user_id = %ctx.user_id,
                    from = %session.status,
                    to = %next,
                    "Live session status changed"
                );
                return Ok(LiveSession {
                    status: next,
                    updated_at: now,
                    ..session
                });
            }
            debug!(room_id = %room_id, "Status changed underneath transition, re-evaluating");
        }
        Err(AppError::conflict("Session status is changing concurrently, try again"))
    }
}

fn validate_room_name(raw: &str) -> AppResult<String> {
    let valid = !raw.is_empty()
        && raw.len() <= ROOM_NAME_MAX_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(raw.to_string())
    } else {
        Err(AppError::invalid_input(format!("Invalid room name: '{raw}'")))
    }
}
