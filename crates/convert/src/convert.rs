//! Record converter
//!
//! Recognized top-level keys: `MESSAGE`/`log` (payload),
//! `_HOSTNAME`/`cluster_name`, `_COMM`, `SYSLOG_IDENTIFIER`, `_PID`,
//! `SYSLOG_FACILITY`, `PRIORITY`, and the nested `kubernetes` map
//! (`host`, `container_name`, `pod_name`, `namespace_name`, `labels`).
//! Everything else is ignored.

use chrono::{DateTime, Utc};

use drain_protocol::{
    Message, Record, StructuredData, Value, APP_NAME_MAX_BYTES, PRIORITY_USER_INFO,
};

/// Tag prefix marking orchestrator event streams.
const EVENT_TAG_PREFIX: &str = "k8s.event";

/// App-name prefix for container log records.
const LOG_APP_PREFIX: &str = "pod.log";

/// Convert one record into a syslog message and its routing namespace.
///
/// The namespace is the record's `kubernetes.namespace_name`, empty when
/// no kubernetes metadata is present. Conversion is pure and total:
/// mistyped values for recognized keys are skipped, never surfaced.
pub fn convert(record: &Record, ts: DateTime<Utc>, tag: &str) -> (Message, String) {
    let mut payload: Vec<u8> = Vec::new();
    let mut hostname = String::new();
    let mut comm = String::new();
    let mut identifier = String::new();
    let mut proc_id = String::new();
    let mut facility: u8 = 0;
    let mut severity: u8 = 0;
    let mut kubernetes: Option<KubernetesMeta> = None;

    for (key, value) in record {
        let Some(key) = key.as_key() else { continue };
        match key {
            "MESSAGE" | "log" => {
                if let Some(bytes) = value.as_bytes() {
                    payload = bytes.to_vec();
                }
            }
            "_HOSTNAME" | "cluster_name" => {
                if let Some(text) = value.as_text() {
                    hostname = text;
                }
            }
            "_COMM" => {
                if let Some(text) = value.as_text() {
                    comm = text;
                }
            }
            "SYSLOG_IDENTIFIER" => {
                if let Some(text) = value.as_text() {
                    identifier = text;
                }
            }
            "_PID" => {
                if let Some(text) = value.as_text() {
                    proc_id = text;
                }
            }
            "SYSLOG_FACILITY" => facility = parse_decimal(value),
            "PRIORITY" => severity = parse_decimal(value),
            "kubernetes" => {
                if let Some(entries) = value.as_map() {
                    if !entries.is_empty() {
                        kubernetes = Some(KubernetesMeta::extract(entries));
                    }
                }
            }
            _ => {}
        }
    }

    // _COMM wins; the identifier only applies when _COMM produced nothing.
    let mut app_name = if comm.is_empty() { identifier } else { comm };

    let computed = u16::from(facility) * 8 + u16::from(severity);
    let mut priority = u8::try_from(computed).unwrap_or(u8::MAX);
    if priority == 0 {
        priority = PRIORITY_USER_INFO;
    }

    let mut structured_data = Vec::new();
    let mut namespace = String::new();

    if let Some(k8s) = kubernetes {
        let prefix = if tag.starts_with(EVENT_TAG_PREFIX) {
            EVENT_TAG_PREFIX
        } else {
            LOG_APP_PREFIX
        };
        app_name = truncate_app_name(format!(
            "{prefix}/{}/{}/{}",
            k8s.namespace_name, k8s.pod_name, k8s.container_name
        ));
        if hostname.is_empty() {
            hostname.clone_from(&k8s.host);
        }

        let mut params = k8s.labels;
        params.push(("namespace_name".into(), k8s.namespace_name.clone()));
        params.push(("pod_name".into(), k8s.pod_name));
        params.push(("container_name".into(), k8s.container_name));
        if !k8s.host.is_empty() {
            params.push(("vm_id".into(), k8s.host));
        }
        structured_data.push(StructuredData {
            id: "kubernetes".into(),
            params,
        });

        namespace = k8s.namespace_name;
    }

    let message = Message {
        priority,
        timestamp: ts,
        hostname,
        app_name,
        proc_id,
        msg_id: String::new(),
        structured_data,
        payload,
    };
    (message, namespace)
}

/// Orchestrator metadata pulled from a record's `kubernetes` map.
#[derive(Debug, Default)]
struct KubernetesMeta {
    host: String,
    container_name: String,
    pod_name: String,
    namespace_name: String,
    labels: Vec<(String, String)>,
}

impl KubernetesMeta {
    fn extract(entries: &[(Value, Value)]) -> Self {
        let mut meta = Self::default();
        for (key, value) in entries {
            let Some(key) = key.as_key() else { continue };
            match key {
                "host" => {
                    if let Some(text) = value.as_text() {
                        meta.host = text;
                    }
                }
                "container_name" => {
                    if let Some(text) = value.as_text() {
                        meta.container_name = text;
                    }
                }
                "pod_name" => {
                    if let Some(text) = value.as_text() {
                        meta.pod_name = text;
                    }
                }
                "namespace_name" => {
                    if let Some(text) = value.as_text() {
                        meta.namespace_name = text;
                    }
                }
                "labels" => {
                    if let Some(labels) = value.as_map() {
                        for (name, label) in labels {
                            if let (Some(name), Some(label)) = (name.as_key(), label.as_text()) {
                                meta.labels.push((name.to_string(), label));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        meta
    }
}

/// Decimal parse with zero on any failure, including out-of-range values.
fn parse_decimal(value: &Value) -> u8 {
    value
        .as_bytes()
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Cap the app-name at the RFC 5424 limit, backing off to a UTF-8
/// code-point boundary so the cut never splits a multibyte sequence.
fn truncate_app_name(mut name: String) -> String {
    if name.len() > APP_NAME_MAX_BYTES {
        let mut end = APP_NAME_MAX_BYTES;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}
