//! RFC 5424 syslog message
//!
//! An immutable message value plus its serialization. Field layout:
//!
//! ```text
//! <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA MSG
//! ```
//!
//! Every empty header field renders as the nil value `-`. Timestamps render
//! as RFC 3339 with a numeric offset (`1970-01-01T00:00:00+00:00`).
//! Structured-data parameter values escape `\`, `"` and `]`. The payload is
//! always newline-terminated; serialization appends the newline if the
//! payload does not already carry one.

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 5424 limit on the APP-NAME field, in bytes.
pub const APP_NAME_MAX_BYTES: usize = 48;

/// Priority substituted when a record signals neither facility nor
/// severity: facility `user` (1) * 8 + severity `info` (6).
pub const PRIORITY_USER_INFO: u8 = 14;

/// One structured-data element: an ID plus ordered name/value parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredData {
    pub id: String,
    pub params: Vec<(String, String)>,
}

/// An immutable RFC 5424 syslog message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub priority: u8,
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    pub app_name: String,
    pub proc_id: String,
    pub msg_id: String,
    pub structured_data: Vec<StructuredData>,
    pub payload: Vec<u8>,
}

impl Message {
    /// Serialize the message, without framing.
    ///
    /// The returned bytes always end with a single newline.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64 + self.payload.len());

        buf.put_u8(b'<');
        push_decimal(&mut buf, u64::from(self.priority));
        buf.put_slice(b">1 ");
        buf.put_slice(
            self.timestamp
                .to_rfc3339_opts(SecondsFormat::AutoSi, false)
                .as_bytes(),
        );
        buf.put_u8(b' ');
        push_field(&mut buf, &self.hostname);
        push_field(&mut buf, &self.app_name);
        push_field(&mut buf, &self.proc_id);
        push_field(&mut buf, &self.msg_id);
        push_structured_data(&mut buf, &self.structured_data);

        buf.put_slice(&self.payload);
        if !self.payload.ends_with(b"\n") {
            buf.put_u8(b'\n');
        }

        buf.freeze()
    }
}

/// Write one header field followed by a space, nil-valued when empty.
fn push_field(buf: &mut BytesMut, field: &str) {
    if field.is_empty() {
        buf.put_u8(b'-');
    } else {
        buf.put_slice(field.as_bytes());
    }
    buf.put_u8(b' ');
}

fn push_structured_data(buf: &mut BytesMut, elements: &[StructuredData]) {
    if elements.is_empty() {
        buf.put_slice(b"- ");
        return;
    }
    for element in elements {
        buf.put_u8(b'[');
        buf.put_slice(element.id.as_bytes());
        for (name, value) in &element.params {
            buf.put_u8(b' ');
            buf.put_slice(name.as_bytes());
            buf.put_slice(b"=\"");
            push_escaped(buf, value);
            buf.put_u8(b'"');
        }
        buf.put_u8(b']');
    }
    buf.put_u8(b' ');
}

/// Param values escape backslash, double quote and closing bracket.
fn push_escaped(buf: &mut BytesMut, value: &str) {
    for byte in value.bytes() {
        if matches!(byte, b'\\' | b'"' | b']') {
            buf.put_u8(b'\\');
        }
        buf.put_u8(byte);
    }
}

fn push_decimal(buf: &mut BytesMut, n: u64) {
    buf.put_slice(n.to_string().as_bytes());
}
