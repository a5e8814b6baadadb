//! Bot wiring for Precinct.
//!
//! Everything platform-facing lives here: configuration, the inbound event
//! dispatcher, the stdio bridge a platform adapter drives, and the HTTP
//! keep-alive stub. The state machines themselves live in
//! `precinct-service`.

pub mod config;
pub mod dispatcher;
pub mod event;
pub mod keepalive;
pub mod stdio;

pub use config::BotConfig;
pub use dispatcher::Dispatcher;
pub use event::{Action, Event};
pub use stdio::StdioGateway;
