//! Route handlers.

pub mod locations;
pub mod submit;
