//! Out - the multi-sink router
//!
//! Built once with the full sink lists and runs until shutdown. Cluster
//! sinks receive every record; namespaced sinks receive only records whose
//! resolved namespace equals theirs. A record resolving to a namespace
//! with no sinks is a silent no-op on the namespaced path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use drain_config::SinkSpec;
use drain_convert::convert;
use drain_protocol::Record;
use drain_sinks::{
    Dialer, SinkState, SyslogSink, SyslogSinkConfig, TcpDialer, TlsDialer, DEFAULT_BUFFER_SIZE,
    DEFAULT_DIAL_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};

/// Options applied to every sink at construction.
#[derive(Debug, Clone, Copy)]
pub struct OutOptions {
    /// Timeout for establishing a connection
    pub dial_timeout: Duration,

    /// Queue capacity per sink
    pub buffer_size: usize,

    /// Per-message write deadline
    pub write_timeout: Duration,
}

impl Default for OutOptions {
    fn default() -> Self {
        Self {
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl OutOptions {
    #[must_use]
    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }
}

/// The plugin surface: fan-out writes plus state reporting.
pub struct Out {
    /// Every sink in construction order, for state reporting
    sinks: Vec<Arc<SyslogSink>>,

    /// Namespace → sinks, built once, order-preserving within a namespace
    by_namespace: HashMap<String, Vec<Arc<SyslogSink>>>,

    /// Sinks that receive every record
    cluster: Vec<Arc<SyslogSink>>,

    /// Worker tasks, one per sink
    workers: Vec<JoinHandle<()>>,
}

impl Out {
    /// Wire up every sink and start its worker.
    ///
    /// A spec with an empty namespace joins the cluster set regardless of
    /// which list carried it. Must be called within a tokio runtime.
    pub fn new(
        namespaced: Vec<SinkSpec>,
        cluster_sinks: Vec<SinkSpec>,
        options: OutOptions,
    ) -> Self {
        let mut sinks = Vec::new();
        let mut by_namespace: HashMap<String, Vec<Arc<SyslogSink>>> = HashMap::new();
        let mut cluster = Vec::new();
        let mut workers = Vec::new();

        for spec in namespaced.into_iter().chain(cluster_sinks) {
            let dialer: Arc<dyn Dialer> = match spec.tls {
                Some(tls) => Arc::new(TlsDialer::new(
                    options.dial_timeout,
                    tls.insecure_skip_verify,
                )),
                None => Arc::new(TcpDialer::new(options.dial_timeout)),
            };
            let config = SyslogSinkConfig::new(spec.addr)
                .with_name(spec.name)
                .with_namespace(spec.namespace)
                .with_buffer_size(options.buffer_size)
                .with_write_timeout(options.write_timeout);

            let (sink, worker) = SyslogSink::new(config, dialer);
            workers.push(tokio::spawn(worker.run()));

            let sink = Arc::new(sink);
            if sink.namespace().is_empty() {
                cluster.push(Arc::clone(&sink));
            } else {
                by_namespace
                    .entry(sink.namespace().to_string())
                    .or_default()
                    .push(Arc::clone(&sink));
            }
            sinks.push(sink);
        }

        tracing::info!(
            sinks = sinks.len(),
            cluster_sinks = cluster.len(),
            namespaces = by_namespace.len(),
            "syslog out ready"
        );

        Self {
            sinks,
            by_namespace,
            cluster,
            workers,
        }
    }

    /// Convert one record and enqueue it at every matching sink.
    ///
    /// Fire-and-forget: never blocks, never fails. Delivery outcomes are
    /// observable through [`Out::sink_states`] and the drop counters.
    pub fn write(&self, record: &Record, ts: DateTime<Utc>, tag: &str) {
        let (message, namespace) = convert(record, ts, tag);
        let message = Arc::new(message);

        for sink in &self.cluster {
            sink.enqueue(Arc::clone(&message));
        }
        if let Some(matching) = self.by_namespace.get(&namespace) {
            for sink in matching {
                sink.enqueue(Arc::clone(&message));
            }
        }
    }

    /// Best-effort snapshot of every sink, in construction order.
    pub fn sink_states(&self) -> Vec<SinkState> {
        self.sinks.iter().map(|sink| sink.state()).collect()
    }

    /// Close every queue and wait for the workers to finish.
    ///
    /// Messages still queued are lost; the in-flight message per sink
    /// completes its delivery attempt.
    pub async fn shutdown(self) {
        let Self {
            sinks,
            by_namespace,
            cluster,
            workers,
        } = self;
        drop(by_namespace);
        drop(cluster);
        drop(sinks);

        for worker in workers {
            let _ = worker.await;
        }
        tracing::info!("syslog out stopped");
    }
}

impl std::fmt::Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Out")
            .field("sinks", &self.sinks.len())
            .field("cluster_sinks", &self.cluster.len())
            .field("namespaces", &self.by_namespace.len())
            .finish()
    }
}
