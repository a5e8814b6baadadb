//! Event dispatch — inbound platform events to service calls and outbound
//! feedback.
//!
//! One handler per event kind, invoked in arrival order. All user-facing
//! text is assembled here; the service layer returns typed outcomes only.

use chrono::{DateTime, FixedOffset, Utc};
use precinct_core::{
  error::Error,
  ids::{ActorId, ChannelId, MessageId},
  store::PrecinctStore,
};
use precinct_service::{Gateway, IncidentMonitor, Reaction, ShiftTracker};
use tracing::{error, warn};

use crate::{config::BotConfig, event::Event};

pub struct Dispatcher<S, G> {
  tracker: ShiftTracker<S>,
  monitor: IncidentMonitor<S>,
  gateway: G,
  config:  BotConfig,
  tz:      FixedOffset,
}

impl<S: PrecinctStore, G: Gateway> Dispatcher<S, G> {
  pub fn new(
    tracker: ShiftTracker<S>,
    monitor: IncidentMonitor<S>,
    gateway: G,
    config: BotConfig,
    tz: FixedOffset,
  ) -> Self {
    Self { tracker, monitor, gateway, config, tz }
  }

  pub fn gateway(&self) -> &G {
    &self.gateway
  }

  fn now(&self) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&self.tz)
  }

  /// Post the punch prompt to the punch channel. Called once at startup so
  /// the buttons are always reachable after a restart.
  pub async fn announce(&self) {
    self
      .post(
        self.config.punch_channel,
        "🕒 **Duty clock** — use the buttons below:",
      )
      .await;
  }

  /// Handle one inbound event to completion.
  pub async fn handle(&self, event: Event) {
    match event {
      Event::PunchIn { actor_id, actor_label } => {
        self.punch_in(actor_id, &actor_label).await;
      }
      Event::PunchOut { actor_id, actor_label } => {
        self.punch_out(actor_id, &actor_label).await;
      }
      Event::Message {
        channel_id,
        message_id,
        author_id,
        author_label,
        author_is_bot,
        text,
      } => {
        self
          .message(channel_id, message_id, author_id, &author_label, author_is_bot, &text)
          .await;
      }
      Event::ReportRequest { channel_id, actor_id, .. } => {
        self.report(channel_id, actor_id).await;
      }
    }
  }

  // ── Punch handlers ────────────────────────────────────────────────────────

  async fn punch_in(&self, actor: ActorId, label: &str) {
    match self.tracker.open(actor, label, self.now()).await {
      Ok(shift) => {
        self
          .dm(
            actor,
            &format!(
              "Entry punch recorded at {}.",
              shift.started_at.format("%H:%M:%S")
            ),
          )
          .await;
        self
          .log(&format!(
            "✅ Entry: {label} ({actor}) at {}",
            shift.started_at.format("%d/%m %H:%M:%S")
          ))
          .await;
      }
      Err(Error::AlreadyOpen(_)) => {
        self.dm(actor, "You already have an open shift!").await;
      }
      Err(e) => {
        error!(error = %e, %actor, "entry punch failed");
        self
          .dm(actor, "❌ Something went wrong while recording your entry.")
          .await;
      }
    }
  }

  async fn punch_out(&self, actor: ActorId, label: &str) {
    match self.tracker.close(actor, self.now()).await {
      Ok(record) => {
        self
          .dm(
            actor,
            &format!(
              "Exit punch recorded at {}.\n⏱️ Time on duty: {}",
              record.ended_at.format("%H:%M:%S"),
              record.duration
            ),
          )
          .await;
        self
          .log(&format!(
            "❌ Exit: {label} ({actor}) at {} | Time: {}",
            record.ended_at.format("%d/%m %H:%M:%S"),
            record.duration
          ))
          .await;
      }
      Err(Error::NotOpen(_)) => {
        self.dm(actor, "You have not punched in!").await;
      }
      Err(e) => {
        error!(error = %e, %actor, "exit punch failed");
        self
          .dm(actor, "❌ Something went wrong while recording your exit.")
          .await;
      }
    }
  }

  // ── Incident scanning ─────────────────────────────────────────────────────

  async fn message(
    &self,
    channel: ChannelId,
    message: MessageId,
    author: ActorId,
    label: &str,
    author_is_bot: bool,
    text: &str,
  ) {
    if author_is_bot || channel != self.config.incident_channel {
      return;
    }

    match self.monitor.scan(text, author, label, self.now()).await {
      Ok(None) => {}
      Ok(Some(recorded)) => {
        self
          .dm(
            author,
            &format!(
              "🚨 **Incident record confirmed** 🚨\n\
               This message logged **{}** incident(s).\n\
               Your total is now **{}**.",
              recorded.in_message, recorded.lifetime_total
            ),
          )
          .await;
        self.react(channel, message, Reaction::Confirmed).await;
      }
      Err(e) => {
        // Nothing was written; signal failure on the message instead of a
        // confirmation.
        error!(error = %e, %author, "failed to record incidents");
        self.react(channel, message, Reaction::Failed).await;
      }
    }
  }

  // ── Reporting ─────────────────────────────────────────────────────────────

  async fn report(&self, channel: ChannelId, actor: ActorId) {
    if !self.gateway.has_role(actor, self.config.admin_role).await {
      self
        .post(channel, "You do not have permission to use this command.")
        .await;
      return;
    }

    match self.monitor.report().await {
      Ok(tallies) if tallies.is_empty() => {
        self.post(channel, "No incidents recorded yet.").await;
      }
      Ok(tallies) => {
        let mut text = String::from("📊 **Incident report by officer**\n");
        for tally in &tallies {
          text.push_str(&format!(
            "👮 {} — **{}** incident(s)\n",
            tally.actor_label, tally.total
          ));
        }
        self.post(channel, text.trim_end()).await;
      }
      Err(e) => {
        error!(error = %e, "incident report query failed");
        self
          .post(channel, "Something went wrong while building the report.")
          .await;
      }
    }
  }

  // ── Best-effort sends ─────────────────────────────────────────────────────

  async fn dm(&self, actor: ActorId, text: &str) {
    if let Err(e) = self.gateway.send_direct_message(actor, text).await {
      warn!(error = %e, %actor, "direct message not delivered");
    }
  }

  async fn post(&self, channel: ChannelId, text: &str) {
    if let Err(e) = self.gateway.post_to_channel(channel, text).await {
      warn!(error = %e, %channel, "channel post not delivered");
    }
  }

  async fn log(&self, text: &str) {
    self.post(self.config.log_channel, text).await;
  }

  async fn react(&self, channel: ChannelId, message: MessageId, reaction: Reaction) {
    if let Err(e) = self.gateway.react_to_message(channel, message, reaction).await {
      warn!(error = %e, %message, "reaction not delivered");
    }
  }
}
