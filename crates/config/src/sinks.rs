//! Sink list configuration types
//!
//! One [`SinkSpec`] per downstream receiver. Sinks are listed as JSON
//! arrays in the plugin configuration:
//!
//! ```json
//! [
//!   {"addr": "logs.example.com:514", "name": "audit", "namespace": "kube-system"},
//!   {"addr": "secure.example.com:6514", "tls": {"insecure_skip_verify": true}}
//! ]
//! ```
//!
//! A spec with an empty namespace belongs to the cluster-sink set and
//! receives every record.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Static configuration for one downstream syslog receiver.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkSpec {
    /// Receiver address (`host:port`)
    pub addr: String,

    /// Human-readable name for state reporting
    #[serde(default)]
    pub name: String,

    /// Routing namespace; empty marks a cluster sink
    #[serde(default)]
    pub namespace: String,

    /// TLS settings; absent means plain TCP
    #[serde(default)]
    pub tls: Option<TlsSpec>,
}

/// TLS settings for a sink.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TlsSpec {
    /// Skip server certificate verification
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

/// Parse one JSON sink list. Blank input is an empty list.
pub fn parse_sink_list(raw: &str) -> Result<Vec<SinkSpec>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let sinks: Vec<SinkSpec> = serde_json::from_str(raw)?;
    for sink in &sinks {
        if sink.addr.is_empty() {
            return Err(ConfigError::MissingAddr {
                name: sink.name.clone(),
            });
        }
        if !is_host_port(&sink.addr) {
            return Err(ConfigError::InvalidAddr {
                name: sink.name.clone(),
                addr: sink.addr.clone(),
            });
        }
    }
    Ok(sinks)
}

/// `host:port` with a non-empty host and a numeric port.
fn is_host_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
