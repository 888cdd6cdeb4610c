//! Live session configuration.

use serde::{Deserialize, Serialize};

/// Live session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Base URL of the embeddable conferencing deployment.
    pub embed_base_url: String,
    /// Poll interval advertised to waiting viewers.
    pub poll_interval_seconds: u64,
    /// Base URL used to link an ended session back to its course.
    pub course_base_url: String,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            embed_base_url: "https://meet.jit.si".to_string(),
            poll_interval_seconds: 5,
            course_base_url: "/courses".to_string(),
        }
    }
}
