//! Outbound connection to the collector.

use std::io::{self, Write};
use std::net::TcpStream;

use tracing::{debug, warn};

/// Failure talking to the collector.
///
/// Fatal for the owning [`Transport`]; recovery is a fresh connection built
/// by the caller after its retry delay.
#[derive(Debug)]
pub enum ConnectionError {
    /// No connection was ever established, or an earlier send failed.
    NotConnected,
    /// The connection broke during a write.
    Io(io::Error),
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::NotConnected => write!(f, "not connected"),
            ConnectionError::Io(e) => write!(f, "connection error: {}", e),
        }
    }
}

impl std::error::Error for ConnectionError {}

impl From<io::Error> for ConnectionError {
    fn from(e: io::Error) -> Self {
        ConnectionError::Io(e)
    }
}

/// One outbound stream to a fixed endpoint.
///
/// The connection is attempted once, eagerly, at construction; construction
/// itself never fails — [`ready`](Transport::ready) reports the outcome. A
/// failed send poisons the instance: the stream is dropped and every later
/// call reports [`ConnectionError::NotConnected`]. Reconnection happens only
/// by constructing a fresh `Transport`.
pub struct Transport {
    stream: Option<TcpStream>,
}

impl Transport {
    pub fn connect(address: &str, port: u16) -> Self {
        let stream = match TcpStream::connect((address, port)) {
            Ok(stream) => {
                debug!("connected to {}:{}", address, port);
                Some(stream)
            }
            Err(e) => {
                warn!("failed to connect to {}:{}: {}", address, port, e);
                None
            }
        };
        Self { stream }
    }

    /// Whether construction produced a live connection and no send has
    /// failed since.
    pub fn ready(&self) -> bool {
        self.stream.is_some()
    }

    /// Writes one framed document to the collector.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), ConnectionError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(ConnectionError::NotConnected);
        };
        if let Err(e) = stream.write_all(payload) {
            self.stream = None;
            return Err(ConnectionError::Io(e));
        }
        Ok(())
    }
}
