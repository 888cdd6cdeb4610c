//! Live session domain entities.

pub mod model;
pub mod provider;
pub mod status;

pub use model::{LiveSession, NewLiveSession};
pub use provider::MeetingProvider;
pub use status::LiveSessionStatus;
