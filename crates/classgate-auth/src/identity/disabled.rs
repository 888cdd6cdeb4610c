//! No-op identity provider.

use async_trait::async_trait;
use tracing::debug;

use classgate_core::result::AppResult;
use classgate_core::types::UserId;
use classgate_entity::user::UserRole;

use super::IdentityProvider;

/// Accepts every write without contacting anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIdentityProvider;

#[async_trait]
impl IdentityProvider for DisabledIdentityProvider {
    async fn set_role(&self, user_id: UserId, role: UserRole) -> AppResult<()> {
        debug!(user_id = %user_id, role = %role, "Identity provider disabled, skipping role sync");
        Ok(())
    }
}
