//! Service tests against the real SQLite backend in memory.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use precinct_core::{
  detect::PhraseMatcher,
  error::Error,
  ids::ActorId,
  shift::ShiftDuration,
  store::PrecinctStore,
};
use precinct_store_sqlite::SqliteStore;

use crate::{IncidentMonitor, ShiftTracker};

fn ts(s: &str) -> DateTime<FixedOffset> {
  DateTime::parse_from_rfc3339(s).unwrap()
}

fn offset_brt() -> FixedOffset {
  FixedOffset::west_opt(3 * 3600).unwrap()
}

async fn tracker() -> (Arc<SqliteStore>, ShiftTracker<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  (store.clone(), ShiftTracker::new(store, offset_brt()))
}

async fn monitor() -> (Arc<SqliteStore>, IncidentMonitor<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let matcher = PhraseMatcher::new("FICHA CRIMINAL").unwrap();
  (store.clone(), IncidentMonitor::new(store, matcher))
}

// ─── Shift tracker ───────────────────────────────────────────────────────────

#[tokio::test]
async fn open_twice_yields_already_open() {
  let (store, t) = tracker().await;
  let now = ts("2025-09-20T08:00:00-03:00");

  t.open(ActorId(1), "rook", now).await.unwrap();
  let err = t
    .open(ActorId(1), "rook", ts("2025-09-20T08:00:05-03:00"))
    .await
    .unwrap_err();

  assert!(matches!(err, Error::AlreadyOpen(ActorId(1))));
  assert!(err.is_user_error());

  // Exactly one open shift, in memory and in the store, with the first
  // punch's timestamp.
  assert_eq!(t.open_count().await, 1);
  let rows = store.list_open_shifts().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].started_at, now);
}

#[tokio::test]
async fn close_without_open_yields_not_open() {
  let (store, t) = tracker().await;

  let err = t
    .close(ActorId(1), ts("2025-09-20T08:00:00-03:00"))
    .await
    .unwrap_err();

  assert!(matches!(err, Error::NotOpen(ActorId(1))));
  assert!(err.is_user_error());
  assert!(store.shift_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn open_then_close_produces_truncated_duration() {
  let (store, t) = tracker().await;

  t.open(ActorId(1), "rook", ts("2025-09-20T08:00:00-03:00"))
    .await
    .unwrap();
  // 5430 s later: 1 h 30 min, 30 s discarded.
  let record = t
    .close(ActorId(1), ts("2025-09-20T09:30:30-03:00"))
    .await
    .unwrap();

  assert_eq!(record.duration, ShiftDuration { hours: 1, minutes: 30 });
  assert_eq!(record.duration.to_string(), "1h 30min");
  assert!(!t.is_open(ActorId(1)).await);
  assert!(store.get_open_shift(ActorId(1)).await.unwrap().is_none());
  assert_eq!(store.shift_history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn actor_can_cycle_open_close_repeatedly() {
  let (store, t) = tracker().await;

  for (start, end) in [
    ("2025-09-20T08:00:00-03:00", "2025-09-20T10:00:00-03:00"),
    ("2025-09-21T08:00:00-03:00", "2025-09-21T12:00:00-03:00"),
  ] {
    t.open(ActorId(1), "rook", ts(start)).await.unwrap();
    t.close(ActorId(1), ts(end)).await.unwrap();
  }

  assert_eq!(store.shift_history().await.unwrap().len(), 2);
  assert_eq!(t.open_count().await, 0);
}

#[tokio::test]
async fn restore_rebuilds_the_exact_open_set() {
  let (store, t) = tracker().await;
  t.open(ActorId(1), "rook", ts("2025-09-20T08:00:00-03:00"))
    .await
    .unwrap();
  t.open(ActorId(2), "pawn", ts("2025-09-20T08:05:00-03:00"))
    .await
    .unwrap();

  // A fresh tracker over the same store simulates a process restart.
  let restarted = ShiftTracker::new(store, offset_brt());
  assert_eq!(restarted.restore().await, 2);
  assert!(restarted.is_open(ActorId(1)).await);
  assert!(restarted.is_open(ActorId(2)).await);

  // The restored timestamps are the stored ones — closing after restart
  // computes the duration from the original punch-in.
  let record = restarted
    .close(ActorId(1), ts("2025-09-20T09:00:00-03:00"))
    .await
    .unwrap();
  assert_eq!(record.duration, ShiftDuration { hours: 1, minutes: 0 });
}

#[tokio::test]
async fn restore_converts_into_the_configured_offset() {
  let (store, t) = tracker().await;
  t.open(ActorId(1), "rook", ts("2025-09-20T08:00:00-03:00"))
    .await
    .unwrap();

  let utc = FixedOffset::east_opt(0).unwrap();
  let restarted = ShiftTracker::new(store.clone(), utc);
  restarted.restore().await;

  // Same instant, expressed in the new offset.
  let rows = store.list_open_shifts().await.unwrap();
  let record = restarted
    .close(ActorId(1), ts("2025-09-20T11:00:00+00:00"))
    .await
    .unwrap();
  assert_eq!(record.started_at.offset().local_minus_utc(), 0);
  assert_eq!(record.started_at, rows[0].started_at);
  assert_eq!(record.duration, ShiftDuration { hours: 0, minutes: 0 });
}

#[tokio::test]
async fn restore_on_empty_store_is_zero() {
  let (_, t) = tracker().await;
  assert_eq!(t.restore().await, 0);
  assert_eq!(t.open_count().await, 0);
}

// ─── Incident monitor ────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_without_match_records_nothing() {
  let (store, m) = monitor().await;

  let outcome = m
    .scan("nothing to see", ActorId(1), "rook", ts("2025-09-20T12:00:00-03:00"))
    .await
    .unwrap();

  assert!(outcome.is_none());
  assert_eq!(store.incident_total(ActorId(1)).await.unwrap(), 0);
}

#[tokio::test]
async fn scan_records_one_row_per_match() {
  let (store, m) = monitor().await;
  let text = "FICHA CRIMINAL anexada; segue outra FICHA CRIMINAL";

  let recorded = m
    .scan(text, ActorId(1), "rook", ts("2025-09-20T12:00:00-03:00"))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(recorded.in_message, 2);
  assert_eq!(recorded.lifetime_total, 2);

  let rows = store.incidents_for_actor(ActorId(1)).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].raw_text, text);
  assert_eq!(rows[1].raw_text, text);
}

#[tokio::test]
async fn scan_accumulates_the_lifetime_total() {
  let (_, m) = monitor().await;
  let at = ts("2025-09-20T12:00:00-03:00");

  m.scan("FICHA CRIMINAL", ActorId(1), "rook", at).await.unwrap();
  let recorded = m
    .scan("FICHA CRIMINAL e FICHA CRIMINAL", ActorId(1), "rook", at)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(recorded.in_message, 2);
  assert_eq!(recorded.lifetime_total, 3);
}

#[tokio::test]
async fn scan_keeps_the_original_text_but_counts_the_folded_form() {
  let (store, m) = monitor().await;
  let obfuscated = "ＦＩＣＨＡ ＣＲＩＭＩＮＡＬ";

  let recorded = m
    .scan(obfuscated, ActorId(1), "rook", ts("2025-09-20T12:00:00-03:00"))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(recorded.in_message, 1);
  let rows = store.incidents_for_actor(ActorId(1)).await.unwrap();
  assert_eq!(rows[0].raw_text, obfuscated);
}

#[tokio::test]
async fn report_orders_actors_by_total() {
  let (_, m) = monitor().await;
  let at = ts("2025-09-20T12:00:00-03:00");

  m.scan("FICHA CRIMINAL", ActorId(2), "pawn", at).await.unwrap();
  m.scan("FICHA CRIMINAL FICHA CRIMINAL FICHA CRIMINAL", ActorId(1), "rook", at)
    .await
    .unwrap();

  let tallies = m.report().await.unwrap();
  assert_eq!(tallies.len(), 2);
  assert_eq!((tallies[0].actor_label.as_str(), tallies[0].total), ("rook", 3));
  assert_eq!((tallies[1].actor_label.as_str(), tallies[1].total), ("pawn", 1));
}
