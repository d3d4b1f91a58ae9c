//! DNS wire format codec.
//!
//! This module encodes DNS queries and decodes DNS responses following
//! RFC 1035 section 4. It is split by message part:
//!
//! - [`name`] - label encoding and compression-pointer resolution
//! - [`header`] - the fixed 12-byte header and its packed flag bits
//! - [`question`] - one question entry
//! - [`record`] - one answer, authority or additional resource record
//! - [`message`] - whole-message query building and response parsing
//!
//! The codec is pure: it performs no I/O, keeps no state between calls and
//! never interprets record data. Decoders read from a `Cursor<&[u8]>` over the
//! complete message so that compression pointers can reach back into earlier
//! parts of the buffer.
//!
//! # Examples
//!
//! ```rust
//! use dnsdig::dns::{DnsMessage, RecordType};
//!
//! let query = DnsMessage::encode_query_with_id(0x7466, "www.yahoo.com", RecordType::A).unwrap();
//! let decoded = DnsMessage::from_bytes(&query).unwrap();
//!
//! assert_eq!(decoded.header.id, 0x7466);
//! assert!(decoded.header.recursion_desired);
//! assert_eq!(decoded.questions[0].name, "www.yahoo.com.");
//! ```
//!
//! # Wire Format Compatibility
//!
//! All multi-byte fields use network byte order (big-endian). Messages larger
//! than [`MAX_UDP_MESSAGE_SIZE`] are never requested since EDNS0 is not used.

use core::fmt;
use std::io::Cursor;
use std::str::FromStr;

pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod record;

pub use error::{Section, WireError};
pub use header::{DnsHeader, ResponseCode, HEADER_LEN};
pub use message::DnsMessage;
pub use name::{pack_domain_name, unpack_domain_name, MAX_NAME_LEN, MAX_POINTER_HOPS};
pub use question::DnsQuestion;
pub use record::ResourceRecord;

/// Largest DNS message carried over UDP without EDNS0 (RFC 1035 §4.2.1).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// A resource record type code.
///
/// Any 16-bit value is representable; the associated constants only name the
/// common ones so they can be parsed from and printed as mnemonics.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::RecordType;
/// use std::str::FromStr;
///
/// assert_eq!(RecordType::from_str("aaaa").unwrap(), RecordType::AAAA);
/// assert_eq!(RecordType::from_str("TYPE99").unwrap(), RecordType(99));
/// assert_eq!(RecordType(99).to_string(), "TYPE99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType(pub u16);

impl RecordType {
    /// IPv4 host address (RFC 1035).
    pub const A: RecordType = RecordType(1);
    /// Authoritative name server (RFC 1035).
    pub const NS: RecordType = RecordType(2);
    /// Canonical name for an alias (RFC 1035).
    pub const CNAME: RecordType = RecordType(5);
    /// Start of a zone of authority (RFC 1035).
    pub const SOA: RecordType = RecordType(6);
    /// Domain name pointer (RFC 1035).
    pub const PTR: RecordType = RecordType(12);
    /// Mail exchange (RFC 1035).
    pub const MX: RecordType = RecordType(15);
    /// Text strings (RFC 1035).
    pub const TXT: RecordType = RecordType(16);
    /// IPv6 host address (RFC 3596).
    pub const AAAA: RecordType = RecordType(28);

    fn mnemonic(self) -> Option<&'static str> {
        match self {
            RecordType::A => Some("A"),
            RecordType::NS => Some("NS"),
            RecordType::CNAME => Some("CNAME"),
            RecordType::SOA => Some("SOA"),
            RecordType::PTR => Some("PTR"),
            RecordType::MX => Some("MX"),
            RecordType::TXT => Some("TXT"),
            RecordType::AAAA => Some("AAAA"),
            _ => None,
        }
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        RecordType(value)
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        value.0
    }
}

impl FromStr for RecordType {
    type Err = String;

    /// Parses a mnemonic (case-insensitive) or the generic `TYPE<n>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let known = match upper.as_str() {
            "A" => Some(RecordType::A),
            "NS" => Some(RecordType::NS),
            "CNAME" => Some(RecordType::CNAME),
            "SOA" => Some(RecordType::SOA),
            "PTR" => Some(RecordType::PTR),
            "MX" => Some(RecordType::MX),
            "TXT" => Some(RecordType::TXT),
            "AAAA" => Some(RecordType::AAAA),
            _ => None,
        };
        if let Some(rtype) = known {
            return Ok(rtype);
        }
        upper
            .strip_prefix("TYPE")
            .and_then(|code| code.parse::<u16>().ok())
            .map(RecordType)
            .ok_or_else(|| format!("Unknown record type: {}", s))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

/// A resource record class code. Practically always [`RecordClass::IN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordClass(pub u16);

impl RecordClass {
    /// The Internet.
    pub const IN: RecordClass = RecordClass(1);
    /// Chaos.
    pub const CH: RecordClass = RecordClass(3);
    /// Hesiod.
    pub const HS: RecordClass = RecordClass(4);
}

impl From<u16> for RecordClass {
    fn from(value: u16) -> Self {
        RecordClass(value)
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RecordClass::IN => f.write_str("IN"),
            RecordClass::CH => f.write_str("CH"),
            RecordClass::HS => f.write_str("HS"),
            RecordClass(other) => write!(f, "CLASS{}", other),
        }
    }
}

/// Returns the next `n` bytes of the underlying buffer and advances past them,
/// or `None` (leaving the cursor untouched) if fewer than `n` remain.
pub(crate) fn take<'a>(cursor: &mut Cursor<&'a [u8]>, n: usize) -> Option<&'a [u8]> {
    let buf: &'a [u8] = *cursor.get_ref();
    let start = usize::try_from(cursor.position()).ok()?;
    let end = start.checked_add(n)?;
    let bytes = buf.get(start..end)?;
    cursor.set_position(end as u64);
    Some(bytes)
}

pub(crate) fn read_u16(cursor: &mut Cursor<&[u8]>) -> Option<u16> {
    take(cursor, 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Option<u32> {
    take(cursor, 4).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Current cursor offset as a buffer index.
pub(crate) fn offset(cursor: &Cursor<&[u8]>) -> usize {
    cursor.position() as usize
}
