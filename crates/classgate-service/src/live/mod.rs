//! Live session lifecycle.

pub mod provider;
pub mod service;
pub mod view;

pub use provider::{ProviderAdapter, ResolvedRoom};
pub use service::{LiveSessionService, ScheduleSession, SessionStatusView};
pub use view::{SessionView, SessionViewGate};
