//! # Upstream Module
//!
//! Client for the remote authentication/user/appliance API, its wire
//! models and its error taxonomy.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, Operation, UpstreamApi};
pub use error::ApiError;
