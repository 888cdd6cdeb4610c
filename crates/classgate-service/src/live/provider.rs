//! Meeting provider adapter.

use serde::Serialize;

use classgate_entity::live::{LiveSession, MeetingProvider};

/// A joinable room, independent of the hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoom {
    /// Where to join. Absent when an external provider has no stored link.
    pub room_url: Option<String>,
    /// Whether the viewer can mount the room in-page.
    pub is_embeddable: bool,
}

/// Maps provider configuration onto `{room_url, is_embeddable}`.
///
/// Embeddable providers derive the URL from the room name under
/// `embed_base_url`. Every other provider, including unknown ones,
/// passes the stored meeting link through and is never embedded.
#[derive(Debug, Clone)]
pub struct ProviderAdapter {
    embed_base_url: String,
}

impl ProviderAdapter {
    /// Creates an adapter embedding under `embed_base_url`.
    pub fn new(embed_base_url: impl Into<String>) -> Self {
        Self {
            embed_base_url: embed_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a provider configuration.
    pub fn resolve(
        &self,
        provider: &MeetingProvider,
        room_name: &str,
        meeting_link: Option<&str>,
    ) -> ResolvedRoom {
        if provider.is_embeddable() {
            ResolvedRoom {
                room_url: Some(format!("{}/{room_name}", self.embed_base_url)),
                is_embeddable: true,
            }
        } else {
            ResolvedRoom {
                room_url: meeting_link.map(str::to_string),
                is_embeddable: false,
            }
        }
    }

    /// Resolve a stored session.
    pub fn resolve_session(&self, session: &LiveSession) -> ResolvedRoom {
        self.resolve(
            &session.provider,
            &session.room_name,
            session.meeting_link.as_deref(),
        )
    }
}
