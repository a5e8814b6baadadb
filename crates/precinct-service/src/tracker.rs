//! The shift punch state machine.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, FixedOffset};
use precinct_core::{
  error::{Error, Result},
  ids::ActorId,
  shift::{OpenShift, ShiftRecord},
  store::PrecinctStore,
};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Per-actor punch state: `CLOSED --open--> OPEN --close--> CLOSED`.
///
/// The in-memory index is a cache over the injected store, populated once
/// by [`restore`](Self::restore). A single mutex serialises open and close
/// across all actors, so two rapid presses of the same button cannot both
/// pass the membership check.
pub struct ShiftTracker<S> {
  store: Arc<S>,
  /// Offset restored timestamps are converted into.
  tz:    FixedOffset,
  open:  Mutex<HashMap<ActorId, OpenShift>>,
}

impl<S: PrecinctStore> ShiftTracker<S> {
  pub fn new(store: Arc<S>, tz: FixedOffset) -> Self {
    Self {
      store,
      tz,
      open: Mutex::new(HashMap::new()),
    }
  }

  /// Record an entry punch at `now`.
  ///
  /// Fails with [`Error::AlreadyOpen`] if the actor is already punched in —
  /// a pure membership check, no time comparison. The open row is persisted
  /// before the lock is released; if that write fails the index entry is
  /// removed again and the operation has no effect.
  pub async fn open(
    &self,
    actor: ActorId,
    label: &str,
    now: DateTime<FixedOffset>,
  ) -> Result<OpenShift> {
    let mut open = self.open.lock().await;
    if open.contains_key(&actor) {
      return Err(Error::AlreadyOpen(actor));
    }

    let shift = OpenShift {
      actor_id:    actor,
      actor_label: label.to_owned(),
      started_at:  now,
    };
    open.insert(actor, shift.clone());

    if let Err(e) = self.store.put_open_shift(&shift).await {
      open.remove(&actor);
      return Err(Error::persistence(e));
    }

    info!(%actor, "shift opened");
    Ok(shift)
  }

  /// Record an exit punch at `now` and append the completed record.
  ///
  /// Fails with [`Error::NotOpen`] if the actor is not punched in. The
  /// history insert and the open-row delete commit together, but the
  /// in-memory entry is removed first: a crash between the two leaves a
  /// stale persisted open row that the next [`restore`](Self::restore)
  /// resurrects. Known window, kept as-is.
  pub async fn close(
    &self,
    actor: ActorId,
    now: DateTime<FixedOffset>,
  ) -> Result<ShiftRecord> {
    let mut open = self.open.lock().await;
    let shift = open.remove(&actor).ok_or(Error::NotOpen(actor))?;

    let record = ShiftRecord::close(shift, now);
    if let Err(e) = self.store.close_shift(&record).await {
      open.insert(
        actor,
        OpenShift {
          actor_id:    record.actor_id,
          actor_label: record.actor_label.clone(),
          started_at:  record.started_at,
        },
      );
      return Err(Error::persistence(e));
    }

    info!(%actor, duration = %record.duration, "shift closed");
    Ok(record)
  }

  /// Reload the persisted open set into the index, converting each
  /// timestamp into the configured offset. Entries are never dropped by
  /// age. Returns the number of restored shifts.
  ///
  /// A store failure is logged and treated as zero open shifts; startup
  /// availability wins over recovering historical open state.
  pub async fn restore(&self) -> usize {
    let rows = match self.store.list_open_shifts().await {
      Ok(rows) => rows,
      Err(e) => {
        error!(error = %e, "failed to load persisted open shifts");
        return 0;
      }
    };

    let mut open = self.open.lock().await;
    open.clear();
    for mut shift in rows {
      shift.started_at = shift.started_at.with_timezone(&self.tz);
      open.insert(shift.actor_id, shift);
    }
    open.len()
  }

  /// Whether `actor` currently has an open shift.
  pub async fn is_open(&self, actor: ActorId) -> bool {
    self.open.lock().await.contains_key(&actor)
  }

  pub async fn open_count(&self) -> usize {
    self.open.lock().await.len()
  }
}
