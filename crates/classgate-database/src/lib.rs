//! # classgate-database
//!
//! Store contracts for every Classgate aggregate, with two backends:
//! PostgreSQL repositories on `sqlx` and in-memory stores on `dashmap`.
//! Services only ever see the contracts in [`store`], bundled as
//! [`Stores`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use stores::Stores;
