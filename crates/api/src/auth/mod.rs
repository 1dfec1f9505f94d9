//! Authentication primitives: JWT access tokens, opaque refresh and
//! unsubscribe tokens, and Argon2id password hashing.

pub mod jwt;
pub mod password;
