//! Runtime configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::FixedOffset;
use precinct_core::ids::{ChannelId, RoleId};
use serde::Deserialize;

/// Runtime bot configuration, deserialised from `precinct.toml` with
/// `PRECINCT_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// SQLite database file.
  pub store_path: PathBuf,

  /// Channel carrying the punch buttons; the punch prompt is posted there
  /// at startup.
  pub punch_channel: ChannelId,

  /// Channel receiving entry/exit echoes.
  pub log_channel: ChannelId,

  /// Channel whose messages are scanned for the flagged phrase.
  pub incident_channel: ChannelId,

  /// Role allowed to request the incident report.
  pub admin_role: RoleId,

  /// UTC offset all timestamps are taken in, e.g. `"-03:00"`.
  #[serde(default = "default_utc_offset")]
  pub utc_offset: String,

  /// Phrase counted as one incident per occurrence.
  #[serde(default = "default_flagged_phrase")]
  pub flagged_phrase: String,

  #[serde(default = "default_keepalive_host")]
  pub keepalive_host: String,

  #[serde(default = "default_keepalive_port")]
  pub keepalive_port: u16,
}

fn default_utc_offset() -> String { "-03:00".to_string() }

fn default_flagged_phrase() -> String { "FICHA CRIMINAL".to_string() }

fn default_keepalive_host() -> String { "0.0.0.0".to_string() }

fn default_keepalive_port() -> u16 { 8080 }

impl BotConfig {
  /// Load from `path` (the file may be absent) layered under `PRECINCT_*`
  /// environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PRECINCT"))
      .build()
      .context("failed to read config")?;

    settings
      .try_deserialize()
      .context("failed to deserialise BotConfig")
  }

  /// Parse `utc_offset` into a chrono offset.
  pub fn offset(&self) -> anyhow::Result<FixedOffset> {
    parse_offset(&self.utc_offset)
  }
}

/// Parse `"+HH:MM"` / `"-HH:MM"` into a [`FixedOffset`].
pub fn parse_offset(s: &str) -> anyhow::Result<FixedOffset> {
  let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
    (1, rest)
  } else if let Some(rest) = s.strip_prefix('-') {
    (-1, rest)
  } else {
    anyhow::bail!("offset must start with '+' or '-': {s:?}");
  };

  let (hours, minutes) = rest
    .split_once(':')
    .with_context(|| format!("offset must be ±HH:MM: {s:?}"))?;
  let hours: i32 = hours.parse().with_context(|| format!("bad offset hours: {s:?}"))?;
  let minutes: i32 = minutes
    .parse()
    .with_context(|| format!("bad offset minutes: {s:?}"))?;

  FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    .with_context(|| format!("offset out of range: {s:?}"))
}
