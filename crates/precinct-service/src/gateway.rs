//! The `Gateway` trait — collaborator capabilities the bot consumes from
//! the chat platform.
//!
//! Delivery is best-effort everywhere: callers log a failed send at warn
//! level and move on. Nothing in the core rolls back because a direct
//! message bounced.

use std::future::Future;

use precinct_core::ids::{ActorId, ChannelId, MessageId, RoleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
  /// The recipient cannot be reached (closed DMs, missing permissions).
  #[error("recipient unreachable: {0}")]
  Unreachable(String),

  #[error("delivery failed: {0}")]
  Delivery(String),
}

/// Visual feedback attached to a scanned message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
  Confirmed,
  Failed,
}

impl Reaction {
  pub fn emoji(self) -> &'static str {
    match self {
      Self::Confirmed => "✅",
      Self::Failed => "❌",
    }
  }
}

/// Outbound capabilities of the hosting platform.
///
/// Implemented by the wiring layer (e.g. the stdio bridge) and by test
/// doubles.
pub trait Gateway: Send + Sync {
  /// Send a private message to `actor`.
  fn send_direct_message<'a>(
    &'a self,
    actor: ActorId,
    text: &'a str,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + 'a;

  /// Post to a channel.
  fn post_to_channel<'a>(
    &'a self,
    channel: ChannelId,
    text: &'a str,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + 'a;

  /// Attach a reaction to an existing message.
  fn react_to_message(
    &self,
    channel: ChannelId,
    message: MessageId,
    reaction: Reaction,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_;

  /// Whether `actor` carries `role` in the platform's permission model.
  fn has_role(
    &self,
    actor: ActorId,
    role: RoleId,
  ) -> impl Future<Output = bool> + Send + '_;
}
