//! Line-delimited JSON bridge to the platform adapter.
//!
//! Inbound: one [`Event`] per stdin line. Outbound: [`StdioGateway`] writes
//! one [`Action`] per stdout line. Malformed input is logged and skipped —
//! one bad line must not take the bridge down.

use std::collections::HashMap;

use precinct_core::{
  ids::{ActorId, ChannelId, MessageId, RoleId},
  store::PrecinctStore,
};
use precinct_service::{Gateway, GatewayError, Reaction};
use tokio::{
  io::{self, AsyncBufReadExt as _, AsyncWriteExt as _, BufReader},
  sync::Mutex,
};
use tracing::warn;

use crate::{
  dispatcher::Dispatcher,
  event::{Action, Event},
};

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// A [`Gateway`] that emits actions as JSON lines on stdout.
///
/// Role checks are answered from the snapshots the adapter forwards with
/// report requests; an actor never seen in one has no roles.
pub struct StdioGateway {
  out:   Mutex<io::Stdout>,
  roles: Mutex<HashMap<ActorId, Vec<RoleId>>>,
}

impl StdioGateway {
  pub fn new() -> Self {
    Self {
      out:   Mutex::new(io::stdout()),
      roles: Mutex::new(HashMap::new()),
    }
  }

  /// Record a role snapshot forwarded by the adapter alongside an event.
  pub async fn note_roles(&self, actor: ActorId, roles: Vec<RoleId>) {
    self.roles.lock().await.insert(actor, roles);
  }

  async fn emit(&self, action: &Action) -> Result<(), GatewayError> {
    let mut line = serde_json::to_string(action)
      .map_err(|e| GatewayError::Delivery(e.to_string()))?;
    line.push('\n');

    let mut out = self.out.lock().await;
    out
      .write_all(line.as_bytes())
      .await
      .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
    out
      .flush()
      .await
      .map_err(|e| GatewayError::Unreachable(e.to_string()))
  }
}

impl Default for StdioGateway {
  fn default() -> Self {
    Self::new()
  }
}

impl Gateway for StdioGateway {
  async fn send_direct_message(
    &self,
    actor: ActorId,
    text: &str,
  ) -> Result<(), GatewayError> {
    self
      .emit(&Action::DirectMessage { actor_id: actor, text: text.to_owned() })
      .await
  }

  async fn post_to_channel(
    &self,
    channel: ChannelId,
    text: &str,
  ) -> Result<(), GatewayError> {
    self
      .emit(&Action::ChannelPost { channel_id: channel, text: text.to_owned() })
      .await
  }

  async fn react_to_message(
    &self,
    channel: ChannelId,
    message: MessageId,
    reaction: Reaction,
  ) -> Result<(), GatewayError> {
    self
      .emit(&Action::React {
        channel_id: channel,
        message_id: message,
        emoji:      reaction.emoji().to_owned(),
      })
      .await
  }

  async fn has_role(&self, actor: ActorId, role: RoleId) -> bool {
    self
      .roles
      .lock()
      .await
      .get(&actor)
      .is_some_and(|roles| roles.contains(&role))
  }
}

// ─── Event loop ──────────────────────────────────────────────────────────────

/// Read one JSON [`Event`] per stdin line and dispatch it, until EOF.
pub async fn run_event_loop<S: PrecinctStore>(
  dispatcher: &Dispatcher<S, StdioGateway>,
) -> anyhow::Result<()> {
  let stdin = BufReader::new(io::stdin());
  let mut lines = stdin.lines();

  while let Some(line) = lines.next_line().await? {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    let event: Event = match serde_json::from_str(line) {
      Ok(event) => event,
      Err(e) => {
        warn!(error = %e, "skipping malformed event line");
        continue;
      }
    };

    if let Event::ReportRequest { actor_id, actor_roles, .. } = &event {
      dispatcher
        .gateway()
        .note_roles(*actor_id, actor_roles.clone())
        .await;
    }

    dispatcher.handle(event).await;
  }

  Ok(())
}
