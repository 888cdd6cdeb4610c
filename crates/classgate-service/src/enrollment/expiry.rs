//! Expiry of stale manual enrollment requests.
//!
//! Only runs when `enrollment.pending_expiry_hours` is configured;
//! otherwise pending requests stay pending until reviewed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use classgate_core::result::AppResult;
use classgate_database::store::EnrollmentStore;
use classgate_entity::enrollment::EnrollmentStatus;

const EXPIRY_NOTE: &str = "request expired";

/// Rejects pending requests older than a configured age.
#[derive(Debug, Clone)]
pub struct PendingExpirySweep {
    enrollments: Arc<dyn EnrollmentStore>,
    max_age: chrono::Duration,
}

impl PendingExpirySweep {
    /// Creates a sweep rejecting requests older than `max_age_hours`.
    pub fn new(enrollments: Arc<dyn EnrollmentStore>, max_age_hours: u64) -> Self {
        let max_age = i64::try_from(max_age_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX);
        Self {
            enrollments,
            max_age,
        }
    }

    /// Reject every pending request made before `now - max_age`.
    ///
    /// Returns the number of requests expired.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<u32> {
        let cutoff = now
            .checked_sub_signed(self.max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut expired = 0;
        for enrollment in self.enrollments.list_pending_before(cutoff).await? {
            let updated = self
                .enrollments
                .transition(
                    enrollment.id,
                    EnrollmentStatus::Pending,
                    EnrollmentStatus::Rejected,
                    EXPIRY_NOTE,
                    now,
                )
                .await?;
            if updated.is_some() {
                expired += 1;
            }
        }
        if expired > 0 {
            info!(expired, "Expired stale enrollment requests");
        }
        Ok(expired)
    }

    /// Sweep every `interval` until `shutdown` fires.
    pub async fn run(self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep(Utc::now()).await {
                        error!(error = %e, "Pending expiry sweep failed");
                    }
                }
            }
        }
    }
}
