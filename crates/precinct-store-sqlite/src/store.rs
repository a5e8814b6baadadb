//! [`SqliteStore`] — the SQLite implementation of [`PrecinctStore`].

use std::path::Path;

use precinct_core::{
  ids::ActorId,
  incident::{IncidentRecord, IncidentTally, NewIncident},
  shift::{OpenShift, ShiftRecord},
  store::PrecinctStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{
    RawIncident, RawOpenShift, RawShiftRecord, encode_actor, encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Precinct store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PrecinctStore impl ──────────────────────────────────────────────────────

impl PrecinctStore for SqliteStore {
  type Error = Error;

  // ── Open shifts ───────────────────────────────────────────────────────────

  async fn get_open_shift(&self, actor: ActorId) -> Result<Option<OpenShift>> {
    let actor_raw = encode_actor(actor);

    let raw: Option<RawOpenShift> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT actor_id, actor_label, started_at
               FROM open_shifts WHERE actor_id = ?1",
              rusqlite::params![actor_raw],
              |row| {
                Ok(RawOpenShift {
                  actor_id:    row.get(0)?,
                  actor_label: row.get(1)?,
                  started_at:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOpenShift::into_shift).transpose()
  }

  async fn put_open_shift(&self, shift: &OpenShift) -> Result<()> {
    let actor_raw = encode_actor(shift.actor_id);
    let label = shift.actor_label.clone();
    let started_at = encode_dt(shift.started_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO open_shifts (actor_id, actor_label, started_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![actor_raw, label, started_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_open_shift(&self, actor: ActorId) -> Result<()> {
    let actor_raw = encode_actor(actor);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM open_shifts WHERE actor_id = ?1",
          rusqlite::params![actor_raw],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_open_shifts(&self) -> Result<Vec<OpenShift>> {
    let raws: Vec<RawOpenShift> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT actor_id, actor_label, started_at FROM open_shifts")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawOpenShift {
              actor_id:    row.get(0)?,
              actor_label: row.get(1)?,
              started_at:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOpenShift::into_shift).collect()
  }

  // ── Shift history ─────────────────────────────────────────────────────────

  async fn close_shift(&self, record: &ShiftRecord) -> Result<()> {
    let actor_raw = encode_actor(record.actor_id);
    let label = record.actor_label.clone();
    let started_at = encode_dt(record.started_at);
    let ended_at = encode_dt(record.ended_at);
    let duration_text = record.duration.to_string();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO shift_history
             (actor_id, actor_label, started_at, ended_at, duration_text)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![actor_raw, label, started_at, ended_at, duration_text],
        )?;
        tx.execute(
          "DELETE FROM open_shifts WHERE actor_id = ?1",
          rusqlite::params![actor_raw],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn shift_history(&self) -> Result<Vec<ShiftRecord>> {
    let raws: Vec<RawShiftRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT actor_id, actor_label, started_at, ended_at
           FROM shift_history ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawShiftRecord {
              actor_id:    row.get(0)?,
              actor_label: row.get(1)?,
              started_at:  row.get(2)?,
              ended_at:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShiftRecord::into_record).collect()
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn append_incidents(
    &self,
    incident: &NewIncident,
    count: usize,
  ) -> Result<u64> {
    let actor_raw = encode_actor(incident.actor_id);
    let label = incident.actor_label.clone();
    let raw_text = incident.raw_text.clone();
    let recorded_at = encode_dt(incident.recorded_at);

    let total: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for _ in 0..count {
          tx.execute(
            "INSERT INTO incidents (actor_id, actor_label, raw_text, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![actor_raw, label, raw_text, recorded_at],
          )?;
        }
        let total = tx.query_row(
          "SELECT COUNT(*) FROM incidents WHERE actor_id = ?1",
          rusqlite::params![actor_raw],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(total)
      })
      .await?;

    Ok(total as u64)
  }

  async fn incident_total(&self, actor: ActorId) -> Result<u64> {
    let actor_raw = encode_actor(actor);

    let total: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM incidents WHERE actor_id = ?1",
          rusqlite::params![actor_raw],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(total as u64)
  }

  async fn incidents_for_actor(
    &self,
    actor: ActorId,
  ) -> Result<Vec<IncidentRecord>> {
    let actor_raw = encode_actor(actor);

    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, actor_id, actor_label, raw_text, recorded_at
           FROM incidents WHERE actor_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![actor_raw], |row| {
            Ok(RawIncident {
              id:          row.get(0)?,
              actor_id:    row.get(1)?,
              actor_label: row.get(2)?,
              raw_text:    row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_record).collect()
  }

  async fn incident_tallies(&self) -> Result<Vec<IncidentTally>> {
    // Label comes from the actor's newest row (SQLite's bare-column-with-MAX
    // semantics); ties on the count go to whoever's first row is oldest.
    let tallies: Vec<(Option<String>, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT labels.actor_label, counts.total
           FROM (SELECT actor_id, COUNT(*) AS total, MIN(id) AS first_id
                 FROM incidents GROUP BY actor_id) counts
           JOIN (SELECT actor_id, actor_label, MAX(id)
                 FROM incidents GROUP BY actor_id) labels
             ON labels.actor_id = counts.actor_id
           ORDER BY counts.total DESC, counts.first_id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      tallies
        .into_iter()
        .map(|(label, total)| IncidentTally {
          actor_label: label.unwrap_or_default(),
          total:       total as u64,
        })
        .collect(),
    )
  }
}
