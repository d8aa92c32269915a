//! Utilities shared by the Conclave packages.

pub mod logger;
pub mod time;
