//! Sink error types
//!
//! All of these are transient: the worker records them on the sink and
//! moves on to the next message. Nothing here terminates a worker.

use std::io;

use thiserror::Error;

/// Errors recorded by a sink worker
#[derive(Debug, Error)]
pub enum SinkError {
    /// Dial failed or timed out
    #[error("dial failed for {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Write to an established connection failed
    #[error("write failed: {0}")]
    Write(#[from] io::Error),

    /// Write deadline exceeded
    #[error("write timed out")]
    WriteTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = SinkError::Dial {
            addr: "127.0.0.1:514".into(),
            source: io::Error::new(ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(err.to_string().contains("127.0.0.1:514"));
        assert!(err.to_string().contains("refused"));

        let err = SinkError::Write(io::Error::new(ErrorKind::BrokenPipe, "pipe"));
        assert!(err.to_string().contains("write failed"));

        let err = SinkError::WriteTimeout;
        assert!(err.to_string().contains("timed out"));
    }
}
