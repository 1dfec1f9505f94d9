//! Request extractors for authentication and authorization.

pub mod auth;
pub mod rbac;

pub use auth::AuthUser;
pub use rbac::{
    RequireActivity, RequireContent, RequireContentDelete, RequireSubscribersAdmin,
    RequireUsersAdmin,
};
