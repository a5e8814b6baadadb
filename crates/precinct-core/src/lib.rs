//! Core types and trait definitions for the Precinct duty bot.
//!
//! This crate is deliberately free of database and HTTP dependencies.
//! All other crates depend on it; it depends on nothing heavier than the
//! text-matching machinery.

pub mod detect;
pub mod error;
pub mod ids;
pub mod incident;
pub mod normalize;
pub mod shift;
pub mod store;

pub use error::{Error, Result};
