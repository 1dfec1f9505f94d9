//! Backlot API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! middleware) so integration tests and the binary entrypoint can both
//! access them.

pub mod activity;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
