//! Incident types.
//!
//! One matched occurrence of the flagged phrase in one message is one
//! incident. A message containing the phrase three times produces three
//! rows with identical text and timestamp.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::ids::ActorId;

/// Input to [`crate::store::PrecinctStore::append_incidents`].
/// The row id is assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewIncident {
  pub actor_id:    ActorId,
  pub actor_label: String,
  /// The original message text, before any normalization.
  pub raw_text:    String,
  pub recorded_at: DateTime<FixedOffset>,
}

/// A stored incident row. Append-only, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
  pub id:          i64,
  pub actor_id:    ActorId,
  pub actor_label: String,
  pub raw_text:    String,
  pub recorded_at: DateTime<FixedOffset>,
}

/// One row of the per-actor report — computed on read, never stored.
/// The label is the one on the actor's newest incident row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentTally {
  pub actor_label: String,
  pub total:       u64,
}
