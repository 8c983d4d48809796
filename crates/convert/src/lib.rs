//! Drain - Convert
//!
//! Translates one untyped agent record into an RFC 5424 [`Message`] plus
//! its routing namespace, applying orchestrator enrichment when the record
//! carries `kubernetes` metadata.
//!
//! # Design Principles
//!
//! - **Pure and total**: conversion never fails and never blocks;
//!   unrecognized or mistyped fields degrade to empty strings or defaults
//! - **Graceful degradation**: a half-broken record still produces a
//!   deliverable message from whatever fields survived
//! - **One conversion per write**: the router converts once and fans the
//!   resulting message out to every matching sink
//!
//! [`Message`]: drain_protocol::Message

mod convert;

pub use convert::convert;
