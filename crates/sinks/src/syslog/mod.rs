//! Syslog Sink
//!
//! One configured downstream receiver plus the in-process machinery that
//! delivers to it: a bounded queue, a single writer worker, an owned
//! connection, counters, and the last-error slot.
//!
//! # Per-sink state machine
//!
//! ```text
//! Disconnected --dial ok--> Connected --write ok--> Connected
//!      ^   \--dial err--> Disconnected    |
//!      |                                  |write err / deadline
//!      +----------------------------------+
//! ```
//!
//! The worker owns the connection exclusively; every other thread touches
//! only the queue and the atomics. On any write failure the worker closes
//! and clears the connection, so the next message re-dials. The worker
//! exits only when the queue is closed (shutdown).
//!
//! # Example
//!
//! ```ignore
//! let config = SyslogSinkConfig::new("logs.example.com:514")
//!     .with_name("audit")
//!     .with_namespace("kube-system");
//! let dialer = Arc::new(TcpDialer::new(DEFAULT_DIAL_TIMEOUT));
//!
//! let (sink, worker) = SyslogSink::new(config, dialer);
//! tokio::spawn(worker.run());
//!
//! sink.enqueue(Arc::new(message));
//! ```

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::timeout;

use drain_protocol::{Frame, Message};

use crate::dial::{Conn, Dialer};
use crate::error::SinkError;
use crate::state::{LastError, SinkState};

/// Default queue capacity per sink
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// Default per-message write deadline
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Emit a drop diagnostic whenever the running total crosses a multiple
/// of this.
const DROP_LOG_INTERVAL: u64 = 1_000;

/// Configuration for one syslog sink.
#[derive(Debug, Clone)]
pub struct SyslogSinkConfig {
    /// Receiver address (`host:port`)
    pub addr: String,

    /// Human-readable name for state reporting
    pub name: String,

    /// Routing namespace; empty marks a cluster sink
    pub namespace: String,

    /// Queue capacity, fixed for the lifetime of the sink
    pub buffer_size: usize,

    /// Per-message write deadline
    pub write_timeout: Duration,
}

impl SyslogSinkConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            name: String::new(),
            namespace: String::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
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

/// Per-sink counters, readable from any thread.
///
/// All operations use relaxed ordering; values may be slightly stale when
/// read, never torn.
#[derive(Debug, Default)]
pub struct SinkCounters {
    /// Messages dropped: queue overflow plus failed deliveries
    messages_dropped: AtomicU64,

    /// Unix nanos of the last delivery attempt
    last_send_attempt_ns: AtomicI64,

    /// Unix nanos of the last successful delivery
    last_send_success_ns: AtomicI64,
}

impl SinkCounters {
    pub const fn new() -> Self {
        Self {
            messages_dropped: AtomicU64::new(0),
            last_send_attempt_ns: AtomicI64::new(0),
            last_send_success_ns: AtomicI64::new(0),
        }
    }

    #[inline]
    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn last_send_attempt_ns(&self) -> i64 {
        self.last_send_attempt_ns.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn last_send_success_ns(&self) -> i64 {
        self.last_send_success_ns.load(Ordering::Relaxed)
    }

    #[inline]
    fn mark_attempt(&self, nanos: i64) {
        self.last_send_attempt_ns.store(nanos, Ordering::Relaxed);
    }

    #[inline]
    fn mark_success(&self, nanos: i64) {
        self.last_send_success_ns.store(nanos, Ordering::Relaxed);
    }
}

/// State shared between the sink handle and its worker.
struct Shared {
    config: SyslogSinkConfig,
    counters: SinkCounters,
    last_error: ArcSwapOption<LastError>,
}

impl Shared {
    fn record_drop(&self) {
        let total = self.counters.messages_dropped.fetch_add(1, Ordering::Relaxed) + 1;
        if total % DROP_LOG_INTERVAL == 0 {
            tracing::warn!(
                addr = %self.config.addr,
                namespace = %self.config.namespace,
                dropped = total,
                "sink dropping messages"
            );
        }
    }

    fn publish_error(&self, err: &SinkError) {
        self.last_error
            .store(Some(Arc::new(LastError::now(err.to_string()))));
    }

    fn clear_error(&self) {
        self.last_error.store(None);
    }
}

/// Handle to one sink: enqueue and observe.
///
/// Cheap to share; the delivery half lives in the paired [`SinkWorker`].
/// Dropping every handle closes the queue, which is how shutdown reaches
/// the worker.
pub struct SyslogSink {
    shared: Arc<Shared>,
    tx: mpsc::Sender<Arc<Message>>,
}

impl SyslogSink {
    /// Create a sink and its worker.
    ///
    /// The worker is not running yet; spawn [`SinkWorker::run`] to start
    /// delivery.
    pub fn new(config: SyslogSinkConfig, dialer: Arc<dyn Dialer>) -> (Self, SinkWorker) {
        let (tx, rx) = mpsc::channel(config.buffer_size);
        let shared = Arc::new(Shared {
            config,
            counters: SinkCounters::new(),
            last_error: ArcSwapOption::new(None),
        });
        let sink = Self {
            shared: Arc::clone(&shared),
            tx,
        };
        let worker = SinkWorker {
            shared,
            rx,
            dialer,
            conn: None,
        };
        (sink, worker)
    }

    /// Enqueue a message without blocking.
    ///
    /// A full queue drops the message and counts it; delivery failures are
    /// handled asynchronously by the worker.
    pub fn enqueue(&self, message: Arc<Message>) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.shared.record_drop(),
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    addr = %self.shared.config.addr,
                    "sink queue closed, discarding message"
                );
            }
        }
    }

    /// Best-effort snapshot of this sink's state.
    pub fn state(&self) -> SinkState {
        let error = self
            .shared
            .last_error
            .load_full()
            .and_then(|e| (!e.message.is_empty()).then(|| e.message.clone()));
        SinkState {
            name: self.shared.config.name.clone(),
            namespace: self.shared.config.namespace.clone(),
            last_successful_send: DateTime::from_timestamp_nanos(
                self.shared.counters.last_send_success_ns(),
            ),
            error,
        }
    }

    pub fn counters(&self) -> &SinkCounters {
        &self.shared.counters
    }

    pub fn addr(&self) -> &str {
        &self.shared.config.addr
    }

    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    pub fn namespace(&self) -> &str {
        &self.shared.config.namespace
    }
}

/// The single writer for one sink.
///
/// Drains the queue serially, dialing lazily and applying the write
/// deadline per message. Exits when the queue closes.
pub struct SinkWorker {
    shared: Arc<Shared>,
    rx: mpsc::Receiver<Arc<Message>>,
    dialer: Arc<dyn Dialer>,
    conn: Option<Conn>,
}

impl SinkWorker {
    /// Run the worker until the sink's queue is closed.
    pub async fn run(mut self) {
        tracing::debug!(
            addr = %self.shared.config.addr,
            namespace = %self.shared.config.namespace,
            "sink worker starting"
        );

        while let Some(message) = self.rx.recv().await {
            self.deliver(&message).await;
            self.shared.counters.mark_attempt(now_nanos());
        }

        self.conn = None;
        tracing::debug!(
            addr = %self.shared.config.addr,
            dropped = self.shared.counters.messages_dropped(),
            "sink worker stopping"
        );
    }

    async fn deliver(&mut self, message: &Message) {
        if self.conn.is_none() {
            match self.dialer.dial(&self.shared.config.addr).await {
                Ok(conn) => self.conn = Some(conn),
                Err(err) => {
                    self.shared.record_drop();
                    self.shared.publish_error(&err);
                    return;
                }
            }
        }
        let Some(conn) = self.conn.as_mut() else {
            return;
        };

        let deadline = self.shared.config.write_timeout;
        match timeout(deadline, Frame::new(message).write_to(conn)).await {
            Ok(Ok(_written)) => {
                self.shared.clear_error();
                self.shared.counters.mark_success(now_nanos());
            }
            Ok(Err(err)) => {
                self.conn = None;
                self.shared.record_drop();
                self.shared.publish_error(&SinkError::Write(err));
            }
            Err(_) => {
                self.conn = None;
                self.shared.record_drop();
                self.shared.publish_error(&SinkError::WriteTimeout);
            }
        }
    }
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

#[cfg(test)]
#[path = "syslog_test.rs"]
mod syslog_test;
