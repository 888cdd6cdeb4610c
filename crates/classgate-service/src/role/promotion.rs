//! Role promotion hook.
//!
//! The enrollment write is authoritative. Promotion runs after it and
//! never fails the caller: identity-provider errors are logged and the
//! local record is updated regardless.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use classgate_auth::identity::IdentityProvider;
use classgate_core::types::UserId;
use classgate_database::store::UserStore;
use classgate_entity::user::{User, UserRole};

/// The role a baseline user is promoted to.
const PROMOTED_ROLE: UserRole = UserRole::Student;

/// Elevates baseline users to student in both role stores.
#[derive(Debug, Clone)]
pub struct RolePromotion {
    users: Arc<dyn UserStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl RolePromotion {
    /// Creates a new promotion hook.
    pub fn new(users: Arc<dyn UserStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { users, identity }
    }

    /// Make sure a local record exists for a caller, seeded with the token role.
    pub async fn mirror_user(&self, user_id: UserId, token_role: UserRole) {
        match self.users.find_by_id(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let mut user = User::new(user_id, None, None);
                user.role = token_role;
                if let Err(e) = self.users.save(&user).await {
                    warn!(user_id = %user_id, error = %e, "Failed to mirror user record");
                }
            }
            Err(e) => warn!(user_id = %user_id, error = %e, "Failed to look up user record"),
        }
    }

    /// Promote `user_id` if its role is still the baseline.
    ///
    /// The local record wins over `token_role`; with neither available
    /// the user is left alone. Returns whether a promotion happened.
    pub async fn promote_if_baseline(&self, user_id: UserId, token_role: Option<UserRole>) -> bool {
        let current = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Some(user.role),
            Ok(None) => token_role,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Skipping role promotion, user lookup failed");
                return false;
            }
        };

        match current {
            Some(role) if role.is_baseline() => {}
            Some(role) => {
                debug!(user_id = %user_id, role = %role, "Role above baseline, no promotion");
                return false;
            }
            None => {
                debug!(user_id = %user_id, "No local record, no promotion");
                return false;
            }
        }

        self.sync_identity(user_id).await;

        if let Err(e) = self.users.set_role(user_id, PROMOTED_ROLE, Utc::now()).await {
            error!(user_id = %user_id, error = %e, "Failed to update local user role");
            return false;
        }

        info!(user_id = %user_id, role = %PROMOTED_ROLE, "User promoted after enrollment");
        true
    }

    /// Push the promoted role to the identity provider, logging failures.
    ///
    /// Returns whether the write succeeded.
    pub async fn sync_identity(&self, user_id: UserId) -> bool {
        match self.identity.set_role(user_id, PROMOTED_ROLE).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Identity provider role sync failed; continuing with local update"
                );
                false
            }
        }
    }
}
