//! DNS resolver implementation.
//!
//! This module provides a single-shot DNS resolver client: it builds a query,
//! performs exactly one round trip to one upstream server and decodes the
//! reply. There is no retransmission, no caching and no recursion; the upstream
//! server is expected to recurse on our behalf (RD is always set).
//!
//! # Examples
//!
//! Basic A record resolution:
//!
//! ```rust,no_run
//! use dnsdig::resolver::Resolver;
//! use std::time::Duration;
//!
//! let resolver = Resolver::new("1.1.1.1:53".parse()?).with_timeout(Duration::from_secs(2));
//! for addr in resolver.lookup_a("www.example.com")? {
//!     println!("{addr}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Validation
//!
//! A reply is accepted only if it decodes cleanly, carries the ID of the query
//! that was sent and has the QR bit set. NXDOMAIN is an answer, not an error:
//! [`Resolver::lookup_a`] returns an empty list for it.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ResolverConfig};
use crate::dns::{
    DnsMessage, MAX_UDP_MESSAGE_SIZE, RecordClass, RecordType, ResourceRecord, ResponseCode,
    WireError,
};
use crate::transport::{Connector, Transport, TransportError, UdpConnector};

/// How long to wait for a reply unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that can occur during DNS resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The datagram exchange failed or timed out. Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply could not be decoded.
    #[error("malformed response: {0}")]
    Protocol(#[source] WireError),

    /// The query name could not be encoded; nothing was sent.
    #[error("invalid query: {0}")]
    InvalidQuery(#[source] WireError),

    /// The reply belongs to some other query.
    #[error("response ID {actual:#06x} does not match query ID {expected:#06x}")]
    IdMismatch { expected: u16, actual: u16 },

    /// The reply has its QR bit clear.
    #[error("received a query where a response was expected")]
    NotAResponse,

    /// The server answered with an RCODE other than NOERROR or NXDOMAIN.
    #[error("DNS server returned an error: {0}")]
    ServerReturnedError(ResponseCode),
}

/// Typed view of a record's data, as exposed to resolver callers.
///
/// The codec keeps RDATA opaque; only IPv4 addresses are interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// An IN/A record with a 4-byte payload.
    A(Ipv4Addr),
    /// Anything else, exactly as received.
    Raw { rtype: RecordType, data: Vec<u8> },
}

impl RData {
    /// Classifies a decoded record, copying its data.
    pub fn from_record(record: &ResourceRecord) -> Self {
        if record.rtype == RecordType::A && record.rclass == RecordClass::IN {
            if let Ok(octets) = <[u8; 4]>::try_from(record.rdata.as_slice()) {
                return RData::A(Ipv4Addr::from(octets));
            }
        }
        RData::Raw {
            rtype: record.rtype,
            data: record.rdata.clone(),
        }
    }
}

/// A stub resolver bound to one upstream server.
///
/// Lookups take `&self` and share nothing: each one opens its own transport
/// through the [`Connector`], uses a fresh random ID and releases the socket
/// before returning.
#[derive(Debug, Clone)]
pub struct Resolver<C = UdpConnector> {
    server: SocketAddr,
    timeout: Duration,
    connector: C,
}

impl Resolver<UdpConnector> {
    /// Creates a UDP resolver for `server` with the default timeout.
    pub fn new(server: SocketAddr) -> Self {
        Self::with_connector(server, UdpConnector)
    }

    /// Creates a UDP resolver from the `[resolver]` configuration section.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.server_addr()?).with_timeout(config.timeout()))
    }
}

impl<C: Connector> Resolver<C> {
    /// Creates a resolver that opens its transports through `connector`.
    pub fn with_connector(server: SocketAddr, connector: C) -> Self {
        Self {
            server,
            timeout: DEFAULT_TIMEOUT,
            connector,
        }
    }

    /// Sets how long each lookup waits for a reply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The upstream server queried by every lookup.
    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// The reply deadline applied to every lookup.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs one query for `name` and returns the decoded reply.
    ///
    /// NXDOMAIN replies are returned as messages; callers inspect
    /// [`DnsMessage::header`] to tell them apart.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidQuery`] if `name` cannot be encoded
    /// - [`ResolveError::Transport`] for socket failures and timeouts
    /// - [`ResolveError::Protocol`] if the reply does not decode
    /// - [`ResolveError::IdMismatch`] and [`ResolveError::NotAResponse`] for
    ///   replies that do not answer this query
    /// - [`ResolveError::ServerReturnedError`] for RCODEs such as SERVFAIL
    pub fn lookup(&self, name: &str, qtype: RecordType) -> Result<DnsMessage, ResolveError> {
        let id = fastrand::u16(..);
        let query = DnsMessage::encode_query_with_id(id, name, qtype)
            .map_err(ResolveError::InvalidQuery)?;

        debug!(
            name = name,
            qtype = %qtype,
            id = id,
            server = %self.server,
            "sending DNS query"
        );

        let reply = {
            let mut transport = self.connector.connect(self.server)?;
            transport.send(&query)?;
            transport.receive(MAX_UDP_MESSAGE_SIZE, self.timeout)?
        };

        let message = DnsMessage::from_bytes(&reply).map_err(ResolveError::Protocol)?;
        validate_response(id, &message)?;

        debug!(
            id = id,
            rcode = %message.header.response_code(),
            answers = message.answers.len(),
            authorities = message.authorities.len(),
            additionals = message.additionals.len(),
            "DNS response accepted"
        );
        Ok(message)
    }

    /// Resolves the IPv4 addresses of `name`, in answer-section order.
    ///
    /// Only answers of type A, class IN with a 4-byte payload are kept. A
    /// name that does not exist, or has no A records, yields an empty list.
    pub fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        let message = self.lookup(name, RecordType::A)?;
        if message.header.response_code() == ResponseCode::NameError {
            return Ok(Vec::new());
        }

        Ok(message
            .answers
            .iter()
            .filter_map(|record| match RData::from_record(record) {
                RData::A(addr) => Some(addr),
                RData::Raw { .. } => None,
            })
            .collect())
    }
}

fn validate_response(expected: u16, message: &DnsMessage) -> Result<(), ResolveError> {
    let header = &message.header;
    if header.id != expected {
        warn!(expected = expected, actual = header.id, "DNS response ID mismatch");
        return Err(ResolveError::IdMismatch {
            expected,
            actual: header.id,
        });
    }
    if !header.is_response {
        return Err(ResolveError::NotAResponse);
    }
    match header.response_code() {
        ResponseCode::NoError | ResponseCode::NameError => Ok(()),
        code => Err(ResolveError::ServerReturnedError(code)),
    }
}
