//! Configuration loading and schema definitions
//!
//! Shared configuration types used by the pipeline, the location watch and hosts.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
