//! Token validation backed by a shared-secret JWT.

mod jwt;

pub use jwt::{Claims, JwtTokenValidator};
