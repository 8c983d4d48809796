//! Drain Configuration
//!
//! JSON-based sink-list parsing. The agent hands the plugin two
//! configuration strings - one JSON array of namespaced sinks, one of
//! cluster sinks - and this crate turns each into typed [`SinkSpec`]
//! values.
//!
//! Validation covers what can be known statically: every address must be
//! present and `host:port` shaped. An unreachable address still surfaces
//! at runtime through the sink's first dial failure, visible in its state
//! snapshot.
//!
//! # Example
//!
//! ```
//! use drain_config::parse_sink_list;
//!
//! let sinks = parse_sink_list(
//!     r#"[{"addr":"logs.example.com:514","namespace":"kube-system"}]"#,
//! ).unwrap();
//! assert_eq!(sinks[0].namespace, "kube-system");
//! ```

mod error;
mod sinks;

pub use error::{ConfigError, Result};
pub use sinks::{parse_sink_list, SinkSpec, TlsSpec};
