//! User domain
//!
//! The caller identity every management operation is evaluated against.

mod entity;

pub use entity::{User, UserRole};
