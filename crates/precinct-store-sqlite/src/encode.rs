//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with their UTC offset
//! preserved. Actor ids are stored bit-for-bit as SQLite INTEGERs — the
//! u64 → i64 cast round-trips losslessly.

use chrono::{DateTime, FixedOffset};
use precinct_core::{
  ids::ActorId,
  incident::IncidentRecord,
  shift::{OpenShift, ShiftDuration, ShiftRecord},
};

use crate::{Error, Result};

// ─── ActorId ─────────────────────────────────────────────────────────────────

pub fn encode_actor(id: ActorId) -> i64 { id.0 as i64 }

pub fn decode_actor(raw: i64) -> ActorId { ActorId(raw as u64) }

// ─── DateTime<FixedOffset> ───────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<FixedOffset>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `open_shifts` row.
pub struct RawOpenShift {
  pub actor_id:    i64,
  pub actor_label: Option<String>,
  pub started_at:  String,
}

impl RawOpenShift {
  pub fn into_shift(self) -> Result<OpenShift> {
    Ok(OpenShift {
      actor_id:    decode_actor(self.actor_id),
      actor_label: self.actor_label.unwrap_or_default(),
      started_at:  decode_dt(&self.started_at)?,
    })
  }
}

/// Raw values read directly from a `shift_history` row.
///
/// The duration is recomputed from the stored bounds rather than re-parsed
/// from `duration_text`; the two agree by construction.
pub struct RawShiftRecord {
  pub actor_id:    i64,
  pub actor_label: Option<String>,
  pub started_at:  String,
  pub ended_at:    String,
}

impl RawShiftRecord {
  pub fn into_record(self) -> Result<ShiftRecord> {
    let started_at = decode_dt(&self.started_at)?;
    let ended_at = decode_dt(&self.ended_at)?;
    Ok(ShiftRecord {
      actor_id: decode_actor(self.actor_id),
      actor_label: self.actor_label.unwrap_or_default(),
      started_at,
      ended_at,
      duration: ShiftDuration::between(started_at, ended_at),
    })
  }
}

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:          i64,
  pub actor_id:    i64,
  pub actor_label: Option<String>,
  pub raw_text:    Option<String>,
  pub recorded_at: String,
}

impl RawIncident {
  pub fn into_record(self) -> Result<IncidentRecord> {
    Ok(IncidentRecord {
      id:          self.id,
      actor_id:    decode_actor(self.actor_id),
      actor_label: self.actor_label.unwrap_or_default(),
      raw_text:    self.raw_text.unwrap_or_default(),
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
