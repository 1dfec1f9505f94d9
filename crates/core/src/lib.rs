//! Domain logic for the Backlot content platform.
//!
//! Everything in this crate is pure: no I/O, no database, no HTTP. The
//! `backlot-db` and `backlot-api` crates build on these types.

pub mod audience;
pub mod content;
pub mod error;
pub mod id;
pub mod pagination;
pub mod production;
pub mod roles;
pub mod types;
pub mod validate;
