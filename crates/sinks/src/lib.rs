//! Drain - Sinks
//!
//! The per-sink delivery machinery: a bounded message queue, a single
//! writer worker, a lazily dialed connection, drop accounting, and an
//! atomically published last-error slot.
//!
//! # Architecture
//!
//! ```text
//! [Router] --Arc<Message>--> [Queue] --> [Sink Worker] --> [Dialer] --> TCP/TLS
//!                  try_send                 one per sink      lazy
//! ```
//!
//! # Key Design
//!
//! - **Non-blocking producers**: enqueue never waits; overflow drops and
//!   counts, with a diagnostic at every 1000th drop
//! - **Single writer**: only the worker touches the connection, so the
//!   socket needs no lock
//! - **Lazy reconnect**: the connection is dialed on first need and
//!   cleared on any write failure; the next message re-dials
//! - **Best-effort state**: counters and the last error are read with
//!   atomic loads from any thread

pub mod dial;
pub mod syslog;

mod error;
mod state;

pub use dial::{Conn, Dialer, TcpDialer, TlsDialer, DEFAULT_DIAL_TIMEOUT};
pub use error::SinkError;
pub use state::{LastError, SinkState};
pub use syslog::{
    SinkCounters, SinkWorker, SyslogSink, SyslogSinkConfig, DEFAULT_BUFFER_SIZE,
    DEFAULT_WRITE_TIMEOUT,
};
