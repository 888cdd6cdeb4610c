//! Status read contract.

use async_trait::async_trait;
use serde::Deserialize;

use classgate_core::result::AppResult;
use classgate_core::types::RoomId;
use classgate_entity::live::LiveSessionStatus;

/// One status read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Current status.
    pub status: LiveSessionStatus,
    /// Joinable URL, when known.
    #[serde(default)]
    pub room_url: Option<String>,
    /// Room name.
    #[serde(default)]
    pub room_name: Option<String>,
    /// Whether the room can be embedded in-page.
    #[serde(default)]
    pub is_embeddable: bool,
}

/// Reads the current status of a session.
#[async_trait]
pub trait StatusSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the status of `room_id`.
    async fn fetch(&self, room_id: &RoomId) -> AppResult<StatusSnapshot>;
}
