//! State machines and collaborator seams for the Precinct bot.
//!
//! Everything here is generic over [`precinct_core::store::PrecinctStore`];
//! nothing knows which backend sits behind it.

pub mod gateway;
pub mod incidents;
pub mod tracker;

pub use gateway::{Gateway, GatewayError, Reaction};
pub use incidents::{IncidentMonitor, RecordedIncidents};
pub use tracker::ShiftTracker;

#[cfg(test)]
mod tests;
