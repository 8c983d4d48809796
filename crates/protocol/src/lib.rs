//! Drain - Protocol
//!
//! Core types that flow through the plugin:
//! - `Record`/`Value` - the dynamically typed input mapping handed over by
//!   the log-collection agent
//! - `Message` - an immutable RFC 5424 syslog message
//! - `Frame` - the RFC 6587 octet-counting wrapper around one message
//!
//! # Design Principles
//!
//! - **Total accessors**: `Value` accessors never fail; unexpected variants
//!   read as absent so a malformed record degrades field-by-field
//! - **Arc-friendly**: a converted `Message` is wrapped in `Arc` for
//!   multi-sink fan-out, so it is immutable after construction
//! - **Stream-ready**: `Frame::write_to` serializes straight onto a
//!   connected socket
//!
//! # Wire Format
//!
//! ```text
//! <len> <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID SD MSG\n
//! ```
//!
//! `len` is the exact byte count of everything after the space, including
//! the terminating newline.

mod frame;
mod message;
mod record;

pub use frame::Frame;
pub use message::{Message, StructuredData, APP_NAME_MAX_BYTES, PRIORITY_USER_INFO};
pub use record::{Record, Value};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Test modules - only compiled during testing
#[cfg(test)]
mod frame_test;
