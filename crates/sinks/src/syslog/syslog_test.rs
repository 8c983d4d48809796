use std::time::Duration;

use chrono::TimeZone;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

use crate::dial::{TcpDialer, DEFAULT_DIAL_TIMEOUT};

use super::*;

fn test_message(payload: &str) -> Arc<Message> {
    Arc::new(Message {
        priority: 14,
        timestamp: Utc.timestamp_opt(0, 0).unwrap(),
        hostname: String::new(),
        app_name: String::new(),
        proc_id: String::new(),
        msg_id: String::new(),
        structured_data: Vec::new(),
        payload: payload.as_bytes().to_vec(),
    })
}

fn tcp_sink(config: SyslogSinkConfig) -> (SyslogSink, SinkWorker) {
    SyslogSink::new(config, Arc::new(TcpDialer::new(DEFAULT_DIAL_TIMEOUT)))
}

/// Reserve and release a local port so dials to it are refused.
async fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

/// Read one `"<len> <body>"` frame off the stream.
async fn read_frame(reader: &mut BufReader<TcpStream>) -> String {
    let mut prefix = Vec::new();
    reader.read_until(b' ', &mut prefix).await.unwrap();
    prefix.pop();
    let len: usize = std::str::from_utf8(&prefix).unwrap().parse().unwrap();

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.unwrap();
    String::from_utf8(body).unwrap()
}

async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}

// =============================================================================
// Config tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = SyslogSinkConfig::new("127.0.0.1:514");

    assert_eq!(config.addr, "127.0.0.1:514");
    assert_eq!(config.name, "");
    assert_eq!(config.namespace, "");
    assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    assert_eq!(config.write_timeout, DEFAULT_WRITE_TIMEOUT);
}

#[test]
fn test_config_builders() {
    let config = SyslogSinkConfig::new("127.0.0.1:514")
        .with_name("audit")
        .with_namespace("kube-system")
        .with_buffer_size(1)
        .with_write_timeout(Duration::from_millis(250));

    assert_eq!(config.name, "audit");
    assert_eq!(config.namespace, "kube-system");
    assert_eq!(config.buffer_size, 1);
    assert_eq!(config.write_timeout, Duration::from_millis(250));
}

// =============================================================================
// Queue overflow
// =============================================================================

#[tokio::test]
async fn test_enqueue_overflow_drops_and_counts() {
    // Worker deliberately not running: the queue fills at capacity 1.
    let (sink, _worker) = tcp_sink(SyslogSinkConfig::new("127.0.0.1:1").with_buffer_size(1));

    sink.enqueue(test_message("a"));
    sink.enqueue(test_message("b"));
    sink.enqueue(test_message("c"));

    assert_eq!(sink.counters().messages_dropped(), 2);
    assert!(sink.state().error.is_none());
}

// =============================================================================
// Delivery
// =============================================================================

#[tokio::test]
async fn test_worker_delivers_in_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let (sink, worker) = tcp_sink(SyslogSinkConfig::new(addr));
    tokio::spawn(worker.run());

    sink.enqueue(test_message("first"));
    sink.enqueue(test_message("second"));

    let (stream, _) = listener.accept().await.unwrap();
    let mut reader = BufReader::new(stream);

    let body = read_frame(&mut reader).await;
    assert_eq!(body, "<14>1 1970-01-01T00:00:00+00:00 - - - - - first\n");
    let body = read_frame(&mut reader).await;
    assert_eq!(body, "<14>1 1970-01-01T00:00:00+00:00 - - - - - second\n");

    eventually("success counters", || {
        sink.counters().last_send_success_ns() > 0
            && sink.counters().last_send_attempt_ns() > 0
    })
    .await;
    assert_eq!(sink.counters().messages_dropped(), 0);
    assert!(sink.state().error.is_none());
}

#[tokio::test]
async fn test_dial_failure_drops_and_surfaces_error() {
    let addr = dead_addr().await;
    let (sink, worker) = tcp_sink(SyslogSinkConfig::new(addr).with_buffer_size(1));
    tokio::spawn(worker.run());

    sink.enqueue(test_message("a"));
    sink.enqueue(test_message("b"));
    sink.enqueue(test_message("c"));

    eventually("drops and error", || {
        sink.counters().messages_dropped() >= 2 && sink.state().error.is_some()
    })
    .await;

    let state = sink.state();
    assert!(state.error.unwrap().contains("dial failed"));
    assert_eq!(state.last_successful_send, Utc.timestamp_opt(0, 0).unwrap());
}

#[tokio::test]
async fn test_success_clears_error() {
    // Reserve a port, fail against it, then bind a receiver on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let (sink, worker) = tcp_sink(SyslogSinkConfig::new(addr.clone()));
    tokio::spawn(worker.run());

    sink.enqueue(test_message("fails"));
    eventually("first error", || sink.state().error.is_some()).await;

    let _listener = TcpListener::bind(&addr).await.unwrap();
    sink.enqueue(test_message("succeeds"));

    eventually("error cleared", || {
        sink.state().error.is_none() && sink.counters().last_send_success_ns() > 0
    })
    .await;
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test]
async fn test_worker_exits_when_queue_closes() {
    let (sink, worker) = tcp_sink(SyslogSinkConfig::new("127.0.0.1:1"));
    let handle = tokio::spawn(worker.run());

    drop(sink);

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("worker did not stop")
        .unwrap();
}
