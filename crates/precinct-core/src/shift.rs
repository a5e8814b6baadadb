//! Shift types — the punch clock's domain model.
//!
//! An [`OpenShift`] is the state between a recorded entry and its matching
//! exit. Closing one converts it into an append-only [`ShiftRecord`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::ids::ActorId;

// ─── Open shift ──────────────────────────────────────────────────────────────

/// An entry punch that has not yet been matched by an exit.
///
/// At most one exists per actor at any time. The persisted set is reloaded
/// verbatim at startup, however old the entries are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenShift {
  pub actor_id:    ActorId,
  /// Display-name snapshot taken at punch-in time.
  pub actor_label: String,
  pub started_at:  DateTime<FixedOffset>,
}

// ─── Completed shift ─────────────────────────────────────────────────────────

/// A completed shift. Created exactly once per open/close pair, append-only,
/// never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRecord {
  pub actor_id:    ActorId,
  pub actor_label: String,
  pub started_at:  DateTime<FixedOffset>,
  pub ended_at:    DateTime<FixedOffset>,
  pub duration:    ShiftDuration,
}

impl ShiftRecord {
  /// Close `shift` at `ended_at`, deriving the display duration.
  pub fn close(shift: OpenShift, ended_at: DateTime<FixedOffset>) -> Self {
    let duration = ShiftDuration::between(shift.started_at, ended_at);
    Self {
      actor_id: shift.actor_id,
      actor_label: shift.actor_label,
      started_at: shift.started_at,
      ended_at,
      duration,
    }
  }
}

// ─── Duration ────────────────────────────────────────────────────────────────

/// Elapsed shift time as whole hours and whole minutes. Seconds are
/// discarded, not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDuration {
  pub hours:   i64,
  pub minutes: i64,
}

impl ShiftDuration {
  pub fn between(
    started_at: DateTime<FixedOffset>,
    ended_at: DateTime<FixedOffset>,
  ) -> Self {
    Self::from_seconds((ended_at - started_at).num_seconds())
  }

  /// Integer division by 3600 and 60; negative spans clamp to zero.
  pub fn from_seconds(seconds: i64) -> Self {
    let seconds = seconds.max(0);
    Self {
      hours:   seconds / 3600,
      minutes: (seconds % 3600) / 60,
    }
  }
}

impl std::fmt::Display for ShiftDuration {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}h {}min", self.hours, self.minutes)
  }
}
