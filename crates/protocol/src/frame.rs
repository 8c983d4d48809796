//! RFC 6587 octet-counting framer
//!
//! Wraps one [`Message`] as `"<len> <rfc5424-bytes>"`, where `len` is the
//! exact byte count of the serialized message (which itself ends with a
//! newline, so frames concatenate on a stream without any extra
//! delimiter). `write_to` streams the frame directly onto a connected
//! socket and reports the bytes written.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::message::Message;

/// Octet-counted frame around one syslog message.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    message: &'a Message,
}

impl<'a> Frame<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Serialize the frame: octet count, one space, message bytes.
    pub fn encode(&self) -> Bytes {
        let body = self.message.encode();
        let mut buf = BytesMut::with_capacity(body.len() + 12);
        buf.put_slice(body.len().to_string().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(&body);
        buf.freeze()
    }

    /// Stream the frame into `writer`, returning the bytes written.
    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<usize>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let frame = self.encode();
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(frame.len())
    }
}
