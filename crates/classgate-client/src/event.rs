//! Events surfaced to the viewing surface.

use classgate_entity::live::LiveSessionStatus;

/// Something the viewer should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The remote status differs from what the viewer was showing.
    StatusChanged {
        /// Status shown before.
        from: LiveSessionStatus,
        /// Status now.
        to: LiveSessionStatus,
    },
    /// The session went live. Emitted once per poller.
    SessionStarted {
        /// Joinable URL.
        room_url: Option<String>,
        /// Mount in-page or open externally.
        is_embeddable: bool,
    },
}
