//! # Session Module
//!
//! Server-side sessions keyed by a browser cookie, managed by
//! `tower-sessions`. A session holds at most one credential plus the
//! notices waiting to be shown.

pub mod data;
pub mod handle;
pub mod layer;
pub mod store;

pub use data::{Notice, NoticeLevel};
pub use handle::{Session, SessionError};
pub use layer::session_layer;
pub use store::{MemoryStore, spawn_purge_task};
