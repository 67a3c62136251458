//! CLI command implementations.

pub mod aggregate;
pub mod calc;
pub mod inspect;
pub mod serve;
