//! Storage record repositories

mod in_memory;
mod postgres;

pub use in_memory::InMemoryMountRepository;
pub use postgres::{PostgresConfig, PostgresMountRepository};
