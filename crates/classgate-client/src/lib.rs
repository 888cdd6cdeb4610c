//! # classgate-client
//!
//! Viewer-side reconciliation of live session status.
//!
//! A [`StatusPoller`] watches a scheduled session on behalf of a
//! non-owner viewer and reports the moment it goes live. Status reads go
//! through a [`StatusSource`]; [`HttpStatusSource`] talks to the
//! Classgate HTTP API.

pub mod event;
pub mod http;
pub mod poller;
pub mod source;

pub use event::ViewerEvent;
pub use http::HttpStatusSource;
pub use poller::{PollerHandle, StatusPoller};
pub use source::{StatusSnapshot, StatusSource};
