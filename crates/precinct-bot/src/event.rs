//! Wire types for the platform bridge.
//!
//! A platform adapter — the process that actually speaks to the chat
//! service — writes one inbound [`Event`] per line on our stdin and
//! executes the [`Action`]s we emit on stdout.

use precinct_core::ids::{ActorId, ChannelId, MessageId, RoleId};
use serde::{Deserialize, Serialize};

/// An inbound platform event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
  /// The entry button was pressed.
  PunchIn {
    actor_id:    ActorId,
    actor_label: String,
  },

  /// The exit button was pressed.
  PunchOut {
    actor_id:    ActorId,
    actor_label: String,
  },

  /// A message arrived in some channel.
  Message {
    channel_id:   ChannelId,
    message_id:   MessageId,
    author_id:    ActorId,
    author_label: String,
    #[serde(default)]
    author_is_bot: bool,
    text: String,
  },

  /// The incident report command was invoked. The adapter snapshots the
  /// invoker's roles into the event; interaction payloads carry them.
  ReportRequest {
    channel_id: ChannelId,
    actor_id:   ActorId,
    #[serde(default)]
    actor_roles: Vec<RoleId>,
  },
}

/// An outbound action for the platform adapter to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
  DirectMessage {
    actor_id: ActorId,
    text:     String,
  },
  ChannelPost {
    channel_id: ChannelId,
    text:       String,
  },
  React {
    channel_id: ChannelId,
    message_id: MessageId,
    emoji:      String,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn events_parse_from_tagged_json() {
    let event: Event = serde_json::from_str(
      r#"{"type":"punch_in","actor_id":7,"actor_label":"rook"}"#,
    )
    .unwrap();
    assert!(matches!(
      event,
      Event::PunchIn { actor_id: ActorId(7), .. }
    ));

    let event: Event = serde_json::from_str(
      r#"{"type":"message","channel_id":1,"message_id":2,"author_id":3,
          "author_label":"rook","text":"hello"}"#,
    )
    .unwrap();
    match event {
      Event::Message { author_is_bot, text, .. } => {
        assert!(!author_is_bot);
        assert_eq!(text, "hello");
      }
      other => panic!("wrong variant: {other:?}"),
    }
  }

  #[test]
  fn actions_serialise_to_tagged_json() {
    let line = serde_json::to_string(&Action::React {
      channel_id: ChannelId(1),
      message_id: MessageId(2),
      emoji:      "✅".into(),
    })
    .unwrap();
    assert!(line.contains(r#""type":"react""#));
    assert!(line.contains(r#""emoji":"✅""#));
  }
}
