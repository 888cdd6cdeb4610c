//! Identity provider role writes.
//!
//! The identity provider holds the authoritative copy of a user's role
//! for token issuance. Writes to it are secondary: callers treat a
//! failure as recoverable and rely on the role reconciler to repair it.

pub mod disabled;
pub mod http;

pub use disabled::DisabledIdentityProvider;
pub use http::HttpIdentityProvider;

use std::sync::Arc;

use async_trait::async_trait;

use classgate_core::config::IdentityConfig;
use classgate_core::result::AppResult;
use classgate_core::types::UserId;
use classgate_entity::user::UserRole;

/// Write access to the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Set the role recorded for `user_id`.
    async fn set_role(&self, user_id: UserId, role: UserRole) -> AppResult<()>;
}

/// Build the provider described by `config`.
pub fn from_config(config: &IdentityConfig) -> AppResult<Arc<dyn IdentityProvider>> {
    if config.enabled {
        Ok(Arc::new(HttpIdentityProvider::new(config)?))
    } else {
        Ok(Arc::new(DisabledIdentityProvider))
    }
}
