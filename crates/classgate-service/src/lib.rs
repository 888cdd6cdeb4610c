//! # classgate-service
//!
//! Business logic for the enrollment gate and the live session
//! lifecycle. Services receive their stores and collaborators as `Arc`
//! handles at construction time and take a [`RequestContext`] describing
//! the caller on every user-initiated operation.

pub mod access;
pub mod context;
pub mod enrollment;
pub mod live;
pub mod role;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessGate;
pub use context::RequestContext;
pub use enrollment::{
    CourseRef, EnrollmentModerationService, EnrollmentOutcome, EnrollmentService,
    PendingExpirySweep,
};
pub use live::{
    LiveSessionService, ProviderAdapter, ResolvedRoom, ScheduleSession, SessionStatusView,
    SessionView, SessionViewGate,
};
pub use role::{ReconcileReport, RolePromotion, RoleReconciler};
