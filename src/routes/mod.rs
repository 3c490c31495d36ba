// # Routes Module
//
// - HTTP route handlers for the frontend, grouped by functionality.
// - Handlers stay thin: they call the credential relay and pick a view or
//   a redirect from the outcome.
//
// ## Available Route Modules
// - `health`: liveness endpoint
// - `auth`: login, registration and logout
// - `pages`: index, the protected listing pages and the 404 fallback
// - `debug`: session diagnostics, mounted only when enabled

/// Health check and monitoring endpoints
pub mod health;

/// Login, registration and logout
pub mod auth;

/// Index and protected listing pages
pub mod pages;

/// Session diagnostics
pub mod debug;

pub const LOGIN_PATH: &str = "/login";
pub const USERS_PATH: &str = "/users";

pub(crate) const CONNECT_ERROR: &str = "Could not connect to the server. Please try again.";
