//! Meeting provider enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend hosting a live session's meeting.
///
/// Unrecognised provider strings are kept as [`MeetingProvider::Other`]
/// and treated as externally hosted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeetingProvider {
    /// Self-hosted/open conferencing, embeddable in the page.
    Jitsi,
    /// Hosted video conferencing.
    Zoom,
    /// Calendar-linked meetings.
    GoogleMeet,
    /// Hosted video conferencing.
    Teams,
    /// Anything else.
    Other(String),
}

impl MeetingProvider {
    /// Whether meetings on this provider can be rendered inside the page.
    pub fn is_embeddable(&self) -> bool {
        matches!(self, Self::Jitsi)
    }

    /// Return the provider as its storage string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Jitsi => "jitsi",
            Self::Zoom => "zoom",
            Self::GoogleMeet => "google_meet",
            Self::Teams => "teams",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for MeetingProvider {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "jitsi" => Self::Jitsi,
            "zoom" => Self::Zoom,
            "google_meet" | "googlemeet" | "meet" => Self::GoogleMeet,
            "teams" => Self::Teams,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for MeetingProvider {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<MeetingProvider> for String {
    fn from(provider: MeetingProvider) -> String {
        provider.as_str().to_string()
    }
}

impl fmt::Display for MeetingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
