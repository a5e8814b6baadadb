//! Error types for `precinct-core`.

use thiserror::Error;

use crate::ids::ActorId;

#[derive(Debug, Error)]
pub enum Error {
  /// The actor already has an open shift. An expected user-input state,
  /// surfaced as a polite message and never logged as an error.
  #[error("actor {0} already has an open shift")]
  AlreadyOpen(ActorId),

  /// The actor has no open shift to close. Expected user-input state.
  #[error("actor {0} has no open shift")]
  NotOpen(ActorId),

  #[error("flagged phrase is empty")]
  EmptyPhrase,

  #[error("flagged phrase does not compile: {0}")]
  InvalidPhrase(#[from] regex::Error),

  /// The backing store refused or lost a write. The interrupted operation
  /// has no partial effect.
  #[error("persistence failure: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store error.
  pub fn persistence(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Persistence(Box::new(e))
  }

  /// True for the expected user-input states (`AlreadyOpen`, `NotOpen`).
  pub fn is_user_error(&self) -> bool {
    matches!(self, Self::AlreadyOpen(_) | Self::NotOpen(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
