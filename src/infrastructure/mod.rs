//! Infrastructure layer - Driver, persistence and service implementations

pub mod auth;
pub mod driver;
pub mod logging;
pub mod mount;
pub mod services;
