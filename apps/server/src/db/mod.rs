//! Persistence layer
//!
//! The REST layer only reads. Everything above this module talks to the
//! `Persistence` trait object; the backend is picked from configuration.

pub mod memory;
pub mod postgres;
pub mod tables;
pub mod traits;

pub use memory::MemoryPersistence;
pub use postgres::PostgresPersistence;
pub use traits::{Column, JoinTable, KeyType, Persistence, Table, Window};
