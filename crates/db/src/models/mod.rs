//! Row structs, wire DTOs, and typed filters, one module per entity.
//!
//! Conventions:
//! - Row structs derive `FromRow` and serialize camelCase (the wire contract).
//! - Create DTOs default optional array/string fields so repositories never
//!   see missing values.
//! - Update DTOs are strict (`deny_unknown_fields`) to block clients from
//!   smuggling privileged fields.
//! - Filters are explicit per-entity structs; no loose maps.

pub mod activity;
pub mod campaign;
pub mod film;
pub mod notification;
pub mod production;
pub mod session;
pub mod settings;
pub mod story;
pub mod subscriber;
pub mod user;
