//! Readiness-driven server core
//!
//! This module implements the accept-and-dispatch loop: a non-blocking
//! listening socket, a readiness poller, and the set of live client
//! connections.
//!
//! # Architecture
//!
//! ```text
//!        ┌───────────────┐
//!        │    Reactor    │ ← bounded poll wait
//!        └───────┬───────┘
//!                │ readiness events
//!        ┌───────┴───────┐
//!        ▼               ▼
//!   ┌──────────┐   ┌────────────┐
//!   │ Acceptor │   │ Connection │ ← one read, one callback,
//!   │ (drain)  │   │  service   │   one response, close
//!   └──────────┘   └────────────┘
//! ```
//!
//! Dispatch is single-threaded: everything between two poll waits runs to
//! completion on the calling thread. A connection is fully read, handled and
//! closed within one readiness notification, except when the read would
//! block, in which case it stays registered and is revisited on the next
//! event. There is no keep-alive: a client sending a second request on the
//! same connection observes EOF.

pub mod connection;
pub mod handler;
pub mod listener;
pub mod reactor;

pub use connection::Client;
pub use handler::{Handler, Status};
pub use reactor::{Reactor, ShutdownHandle};

use crate::config::Config;
use crate::error::ServerError;

/// Binds per the config and serves until shutdown or a fatal wait error.
pub fn run<H: Handler>(cfg: &Config, handler: H) -> Result<(), ServerError> {
    Reactor::new(cfg, handler)?.run()
}
