//! The fixed 12-byte DNS message header.

use std::io::Cursor;

use super::{WireError, offset, take};

/// Size of the DNS header on the wire.
pub const HEADER_LEN: usize = 12;

const QR_BIT: u16 = 1 << 15;
const AA_BIT: u16 = 1 << 10;
const TC_BIT: u16 = 1 << 9;
const RD_BIT: u16 = 1 << 8;
const RA_BIT: u16 = 1 << 7;

/// Represents the 12-byte header of a DNS message according to RFC 1035.
///
/// # Layout
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// |                    ANCOUNT                    |
/// |                    NSCOUNT                    |
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// `opcode`, `z` and `rcode` are narrower than their Rust types; bits beyond
/// their field width are dropped when the header is packed.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::DnsHeader;
///
/// let header = DnsHeader {
///     id: 0x7466,
///     recursion_desired: true,
///     question_count: 1,
///     ..DnsHeader::default()
/// };
///
/// assert_eq!(
///     header.to_bytes(),
///     [0x74, 0x66, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DnsHeader {
    /// Identifier copied from query to reply so the two can be matched.
    pub id: u16,
    /// `false` for a query, `true` for a response.
    pub is_response: bool,
    /// Kind of query (4 bits). 0 is a standard query.
    pub opcode: u8,
    /// Authoritative answer.
    pub authoritative: bool,
    /// Message was truncated to fit the transport.
    pub truncated: bool,
    /// Recursion desired.
    pub recursion_desired: bool,
    /// Recursion available.
    pub recursion_available: bool,
    /// Reserved (3 bits).
    pub z: u8,
    /// Response code (4 bits). See [`DnsHeader::response_code`].
    pub rcode: u8,
    /// Number of entries in the question section.
    pub question_count: u16,
    /// Number of resource records in the answer section.
    pub answer_count: u16,
    /// Number of name server resource records in the authority section.
    pub authority_count: u16,
    /// Number of resource records in the additional section.
    pub additional_count: u16,
}

/// Represents the 4-bit Response Code (RCODE) field in the DNS header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResponseCode {
    /// No error condition (RCODE = 0).
    NoError,
    /// Format error (RCODE = 1): the server could not interpret the query.
    FormatError,
    /// Server failure (RCODE = 2).
    ServerFailure,
    /// Name error (RCODE = 3), commonly known as NXDOMAIN.
    NameError,
    /// Not implemented (RCODE = 4).
    NotImplemented,
    /// Refused (RCODE = 5).
    Refused,
    /// Any other value, carried unchanged.
    Other(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseCode::NoError => f.write_str("NOERROR"),
            ResponseCode::FormatError => f.write_str("FORMERR"),
            ResponseCode::ServerFailure => f.write_str("SERVFAIL"),
            ResponseCode::NameError => f.write_str("NXDOMAIN"),
            ResponseCode::NotImplemented => f.write_str("NOTIMP"),
            ResponseCode::Refused => f.write_str("REFUSED"),
            ResponseCode::Other(code) => write!(f, "RCODE{}", code),
        }
    }
}

impl DnsHeader {
    /// Packs the 16-bit flags word.
    pub fn flags(&self) -> u16 {
        let mut flags = 0u16;
        if self.is_response {
            flags |= QR_BIT;
        }
        flags |= u16::from(self.opcode & 0x0F) << 11;
        if self.authoritative {
            flags |= AA_BIT;
        }
        if self.truncated {
            flags |= TC_BIT;
        }
        if self.recursion_desired {
            flags |= RD_BIT;
        }
        if self.recursion_available {
            flags |= RA_BIT;
        }
        flags |= u16::from(self.z & 0x07) << 4;
        flags | u16::from(self.rcode & 0x0F)
    }

    fn set_flags(&mut self, flags: u16) {
        self.is_response = flags & QR_BIT != 0;
        self.opcode = ((flags >> 11) & 0x0F) as u8;
        self.authoritative = flags & AA_BIT != 0;
        self.truncated = flags & TC_BIT != 0;
        self.recursion_desired = flags & RD_BIT != 0;
        self.recursion_available = flags & RA_BIT != 0;
        self.z = ((flags >> 4) & 0x07) as u8;
        self.rcode = (flags & 0x0F) as u8;
    }

    /// Serializes the header into exactly 12 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&self.id.to_be_bytes());
        out[2..4].copy_from_slice(&self.flags().to_be_bytes());
        out[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        out[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        out[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        out[10..12].copy_from_slice(&self.additional_count.to_be_bytes());
        out
    }

    /// Appends the serialized header to `buffer`.
    pub fn pack(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.to_bytes());
    }

    /// Deserializes a DNS header at the cursor position, advancing it by 12.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedHeader`] if fewer than 12 bytes remain. The cursor
    /// is not moved in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dnsdig::dns::DnsHeader;
    /// use std::io::Cursor;
    ///
    /// let data = [0x74, 0x66, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    /// let mut cursor = Cursor::new(&data[..]);
    /// let header = DnsHeader::from_bytes(&mut cursor).unwrap();
    ///
    /// assert_eq!(header.id, 0x7466);
    /// assert!(header.recursion_desired);
    /// assert_eq!(cursor.position(), 12);
    /// ```
    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let start = offset(cursor);
        let bytes = take(cursor, HEADER_LEN).ok_or_else(|| WireError::TruncatedHeader {
            offset: start,
            available: cursor.get_ref().len().saturating_sub(start),
        })?;

        let word = |i: usize| u16::from_be_bytes([bytes[i], bytes[i + 1]]);

        let mut header = DnsHeader {
            id: word(0),
            question_count: word(4),
            answer_count: word(6),
            authority_count: word(8),
            additional_count: word(10),
            ..DnsHeader::default()
        };
        header.set_flags(word(2));
        Ok(header)
    }

    /// Extracts the response code from the RCODE bits.
    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.rcode)
    }
}
