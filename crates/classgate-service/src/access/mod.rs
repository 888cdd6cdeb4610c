//! Live session access control.

pub mod gate;

pub use gate::AccessGate;
