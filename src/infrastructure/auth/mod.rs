//! Authentication infrastructure module
//!
//! Bearer tokens carry the caller's role and base path.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
