//! # Strata I/O
//!
//! Persistence for Strata worlds: the JSON world layout, a directory-backed
//! world database, and dispatch of JSON remote calls onto open databases.

pub mod database;
pub mod error;
pub mod format;
pub mod rpc;

pub use database::WorldDatabase;
pub use error::PersistError;
pub use format::{LayerFile, ShapeFile, WorldFile};
pub use rpc::{JsonCall, Scope};
