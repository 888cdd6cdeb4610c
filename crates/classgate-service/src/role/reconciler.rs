//! Role reconciliation between enrollment grants and user roles.
//!
//! Repairs promotions whose secondary writes were lost: baseline users
//! holding a grant are promoted, and students holding a grant have their
//! role pushed to the identity provider again (the write is idempotent).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use classgate_core::result::AppResult;
use classgate_database::store::{EnrollmentStore, UserStore};
use classgate_entity::user::UserRole;

use super::promotion::RolePromotion;

/// Counters from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Users inspected.
    pub examined: u32,
    /// Baseline users promoted.
    pub promoted: u32,
    /// Students whose role was pushed to the identity provider again.
    pub resynced: u32,
    /// Writes that failed and will be retried next pass.
    pub failed: u32,
}

/// Re-derives user roles from enrollment state.
#[derive(Debug, Clone)]
pub struct RoleReconciler {
    users: Arc<dyn UserStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    promotion: RolePromotion,
}

impl RoleReconciler {
    /// Creates a new reconciler.
    pub fn new(
        users: Arc<dyn UserStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        promotion: RolePromotion,
    ) -> Self {
        Self {
            users,
            enrollments,
            promotion,
        }
    }

    /// Performs one full pass.
    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for user in self.users.list_by_role(UserRole::Guest).await? {
            report.examined += 1;
            if !self.enrollments.has_active_grant(user.id).await? {
                continue;
            }
            if self.promotion.promote_if_baseline(user.id, None).await {
                report.promoted += 1;
            } else {
                report.failed += 1;
            }
        }

        for user in self.users.list_by_role(UserRole::Student).await? {
            report.examined += 1;
            if !self.enrollments.has_active_grant(user.id).await? {
                continue;
            }
            if self.promotion.sync_identity(user.id).await {
                report.resynced += 1;
            } else {
                report.failed += 1;
            }
        }

        if report.promoted > 0 || report.failed > 0 {
            warn!(
                promoted = report.promoted,
                failed = report.failed,
                "Role drift detected and reconciled"
            );
        }
        Ok(report)
    }

    /// Runs [`Self::reconcile`] every `interval` until `shutdown` fires.
    pub async fn run(self, interval: Duration, shutdown: CancellationToken) {
        info!(interval_secs = interval.as_secs(), "Role reconciler started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.reconcile().await {
                        error!(error = %e, "Role reconciliation pass failed");
                    }
                }
            }
        }
        info!("Role reconciler stopped");
    }
}
