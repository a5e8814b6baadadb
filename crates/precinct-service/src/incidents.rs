//! Flagged-phrase scanning and incident recording.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use precinct_core::{
  detect::PhraseMatcher,
  error::{Error, Result},
  ids::ActorId,
  incident::{IncidentTally, NewIncident},
  store::PrecinctStore,
};
use tracing::info;

/// Outcome of recording a message's matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedIncidents {
  /// Matches found in this message.
  pub in_message:     usize,
  /// The author's lifetime total after this message.
  pub lifetime_total: u64,
}

/// Scans channel messages and turns each phrase match into a stored
/// incident row.
pub struct IncidentMonitor<S> {
  store:   Arc<S>,
  matcher: PhraseMatcher,
}

impl<S: PrecinctStore> IncidentMonitor<S> {
  pub fn new(store: Arc<S>, matcher: PhraseMatcher) -> Self {
    Self { store, matcher }
  }

  /// Scan `text` and record one incident per match.
  ///
  /// Zero matches: no side effect, `Ok(None)`. Otherwise all rows and the
  /// returned lifetime total commit together; on a store failure nothing is
  /// written and the caller must signal failure instead of success.
  pub async fn scan(
    &self,
    text: &str,
    author: ActorId,
    label: &str,
    now: DateTime<FixedOffset>,
  ) -> Result<Option<RecordedIncidents>> {
    let matches = self.matcher.count(text);
    if matches == 0 {
      return Ok(None);
    }

    let incident = NewIncident {
      actor_id:    author,
      actor_label: label.to_owned(),
      raw_text:    text.to_owned(),
      recorded_at: now,
    };
    let lifetime_total = self
      .store
      .append_incidents(&incident, matches)
      .await
      .map_err(Error::persistence)?;

    info!(%author, matches, lifetime_total, "incidents recorded");
    Ok(Some(RecordedIncidents {
      in_message: matches,
      lifetime_total,
    }))
  }

  /// Per-actor incident totals, busiest first. Pure read.
  pub async fn report(&self) -> Result<Vec<IncidentTally>> {
    self.store.incident_tallies().await.map_err(Error::persistence)
  }
}
