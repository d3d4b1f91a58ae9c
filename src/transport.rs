//! UDP transport for DNS queries (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is with no framing. The resolver never talks to a
//! socket directly: it asks a [`Connector`] for a fresh [`Transport`] per
//! lookup, so tests can substitute an in-memory exchange for the network.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Errors raised while exchanging datagrams with the upstream server.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No datagram arrived before the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// A socket operation failed.
    #[error("{op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    fn io(op: &'static str, source: io::Error) -> Self {
        TransportError::Io { op, source }
    }
}

/// One datagram exchange channel to a single server.
pub trait Transport {
    /// Sends one complete message.
    fn send(&mut self, message: &[u8]) -> Result<(), TransportError>;

    /// Blocks for at most `timeout` and returns the first datagram received,
    /// cut to `max_len` bytes.
    fn receive(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// Opens a [`Transport`] to a server. Called once per lookup.
pub trait Connector {
    type Transport: Transport;

    /// Opens a fresh transport to `server`.
    fn connect(&self, server: SocketAddr) -> Result<Self::Transport, TransportError>;
}

/// Opens a connected [`UdpTransport`] on an ephemeral local port.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpConnector;

impl Connector for UdpConnector {
    type Transport = UdpTransport;

    fn connect(&self, server: SocketAddr) -> Result<UdpTransport, TransportError> {
        UdpTransport::connect(server)
    }
}

/// DNS over UDP transport.
///
/// The socket is connected to the server, so the kernel discards datagrams
/// from any other source. Dropping the transport closes the socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    server: SocketAddr,
}

impl UdpTransport {
    /// Binds an ephemeral local port of the server's family and connects it.
    pub fn connect(server: SocketAddr) -> Result<Self, TransportError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if server.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr).map_err(|e| TransportError::io("bind", e))?;
        socket
            .connect(server)
            .map_err(|e| TransportError::io("connect", e))?;

        debug!(
            server = %server,
            local = ?socket.local_addr().ok(),
            "UDP socket opened"
        );

        Ok(Self { socket, server })
    }

    /// The server this transport is connected to.
    pub fn server(&self) -> SocketAddr {
        self.server
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let bytes_sent = self
            .socket
            .send(message)
            .map_err(|e| TransportError::io("send", e))?;

        debug!(server = %self.server, bytes_sent = bytes_sent, "UDP query sent");
        Ok(())
    }

    fn receive(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        // set_read_timeout rejects a zero duration with InvalidInput.
        if timeout.is_zero() {
            return Err(TransportError::Timeout(timeout));
        }
        self.socket
            .set_read_timeout(Some(timeout))
            .map_err(|e| TransportError::io("set_read_timeout", e))?;

        let mut recv_buf = vec![0u8; max_len];
        let bytes_received = self.socket.recv(&mut recv_buf).map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => TransportError::Timeout(timeout),
            _ => TransportError::io("recv", e),
        })?;
        recv_buf.truncate(bytes_received);

        debug!(
            server = %self.server,
            bytes_received = bytes_received,
            "UDP response received"
        );
        Ok(recv_buf)
    }
}
