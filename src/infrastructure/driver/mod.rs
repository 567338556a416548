//! Storage driver implementations and the driver manager

#[cfg(test)]
pub(crate) mod fake;
mod local;
mod manager;

pub use local::LocalDriver;
pub use manager::{DriverConstructor, DriverManager};
