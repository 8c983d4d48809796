//! Drain - Pipeline
//!
//! The fan-out router that carries agent records to downstream syslog
//! receivers.
//!
//! # Architecture
//!
//! ```text
//! [Agent]                   [Out]                      [Sinks]
//!   Write ──→ convert ──→ Arc<Message> ──→ cluster set ──→ worker ──→ TCP/TLS
//!                              │
//!                              └──→ namespace index ──→ worker ──→ TCP/TLS
//! ```
//!
//! # Key Design
//!
//! - **One conversion per write**: the record is converted once; every
//!   matching sink enqueues the same `Arc<Message>`
//! - **Read-only index**: the namespace → sinks mapping is built at
//!   construction and never changes, so routing takes no locks
//! - **No errors across the boundary**: `write` returns nothing; failures
//!   are visible only through counters, state snapshots, and drop logs
//!
//! # Example
//!
//! ```ignore
//! use drain_pipeline::{Out, OutOptions, SinkSpec};
//!
//! let sinks = vec![SinkSpec {
//!     addr: "logs.example.com:514".into(),
//!     name: "audit".into(),
//!     namespace: "kube-system".into(),
//!     tls: None,
//! }];
//! let out = Out::new(sinks, Vec::new(), OutOptions::default());
//!
//! out.write(&record, timestamp, tag);
//! let states = out.sink_states();
//! ```

mod out;

pub use out::{Out, OutOptions};

// Re-export the embedding surface for convenience
pub use drain_config::{parse_sink_list, ConfigError, SinkSpec, TlsSpec};
pub use drain_convert::convert;
pub use drain_protocol::{Message, Record, Value};
pub use drain_sinks::SinkState;
