//! The `PrecinctStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `precinct-store-sqlite`). The service layer depends on this abstraction,
//! not on any concrete backend; its in-memory open-shift index is a cache
//! over it, populated once at startup.

use std::future::Future;

use crate::{
  ids::ActorId,
  incident::{IncidentRecord, IncidentTally, NewIncident},
  shift::{OpenShift, ShiftRecord},
};

/// Abstraction over a Precinct storage backend.
///
/// Shift history and incident rows are append-only. Compound writes
/// (`close_shift`, `append_incidents`) must commit as a single transaction —
/// no suspension point splits them.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait PrecinctStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Open shifts ───────────────────────────────────────────────────────

  /// Retrieve the open row for `actor`. Returns `None` if not punched in.
  fn get_open_shift(
    &self,
    actor: ActorId,
  ) -> impl Future<Output = Result<Option<OpenShift>, Self::Error>> + Send + '_;

  /// Upsert the open row for `shift.actor_id`.
  fn put_open_shift<'a>(
    &'a self,
    shift: &'a OpenShift,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the open row for `actor`. Deleting a missing row is not an
  /// error.
  fn delete_open_shift(
    &self,
    actor: ActorId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All persisted open rows, in no particular order.
  fn list_open_shifts(
    &self,
  ) -> impl Future<Output = Result<Vec<OpenShift>, Self::Error>> + Send + '_;

  // ── Shift history — append-only ───────────────────────────────────────

  /// Append `record` to the history and delete the matching open row, as
  /// one transaction.
  fn close_shift<'a>(
    &'a self,
    record: &'a ShiftRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All completed shifts, oldest first.
  fn shift_history(
    &self,
  ) -> impl Future<Output = Result<Vec<ShiftRecord>, Self::Error>> + Send + '_;

  // ── Incidents — append-only ───────────────────────────────────────────

  /// Insert `count` identical rows for `incident` and return the author's
  /// lifetime total, as one transaction.
  fn append_incidents<'a>(
    &'a self,
    incident: &'a NewIncident,
    count: usize,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// The actor's lifetime incident total.
  fn incident_total(
    &self,
    actor: ActorId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// All incident rows for `actor`, oldest first.
  fn incidents_for_actor(
    &self,
    actor: ActorId,
  ) -> impl Future<Output = Result<Vec<IncidentRecord>, Self::Error>> + Send + '_;

  /// Per-actor totals: label resolved from the actor's newest row, ordered
  /// by count descending, ties broken by whoever's first row is oldest.
  fn incident_tallies(
    &self,
  ) -> impl Future<Output = Result<Vec<IncidentTally>, Self::Error>> + Send + '_;
}
