use std::io::Cursor;

use super::{
    RecordClass, RecordType, WireError, offset, pack_domain_name, read_u16, unpack_domain_name,
};

/// Represents a DNS question section entry in a DNS message.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::{DnsQuestion, RecordClass, RecordType};
///
/// let question = DnsQuestion {
///     name: "www.example.com".to_string(),
///     qtype: RecordType::A,
///     qclass: RecordClass::IN,
/// };
///
/// let mut buffer = Vec::new();
/// question.pack(&mut buffer).unwrap();
/// assert_eq!(&buffer[buffer.len() - 4..], &[0, 1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// The domain name being queried. Decoded names are always rooted.
    pub name: String,
    /// The type of record being requested.
    pub qtype: RecordType,
    /// The query class, normally [`RecordClass::IN`].
    pub qclass: RecordClass,
}

impl DnsQuestion {
    /// Serializes the question and appends it to `buffer`.
    ///
    /// # Errors
    ///
    /// Propagates name encoding errors; nothing is appended in that case.
    pub fn pack(&self, buffer: &mut Vec<u8>) -> Result<(), WireError> {
        pack_domain_name(buffer, &self.name)?;
        buffer.extend_from_slice(&self.qtype.0.to_be_bytes());
        buffer.extend_from_slice(&self.qclass.0.to_be_bytes());
        Ok(())
    }

    /// Deserializes a question at the cursor position.
    ///
    /// # Errors
    ///
    /// Name decoding errors are returned unchanged;
    /// [`WireError::TruncatedQuestion`] if the type and class do not fit.
    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let name = unpack_domain_name(cursor)?;

        let fixed_at = offset(cursor);
        let truncated = || WireError::TruncatedQuestion { offset: fixed_at };
        let qtype = read_u16(cursor).ok_or_else(truncated)?;
        let qclass = read_u16(cursor).ok_or_else(truncated)?;

        Ok(DnsQuestion {
            name,
            qtype: RecordType(qtype),
            qclass: RecordClass(qclass),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_www_yahoo_com() {
        let question = DnsQuestion {
            name: "www.yahoo.com".to_string(),
            qtype: RecordType::A,
            qclass: RecordClass::IN,
        };
        let mut buffer = Vec::new();
        question.pack(&mut buffer).unwrap();

        let mut expected = b"\x03www\x05yahoo\x03com\x00".to_vec();
        expected.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_from_bytes() {
        let data = [
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', // "example"
            3, b'c', b'o', b'm', // "com"
            0, // root
            0, 28, // Type AAAA
            0, 1, // Class IN
        ];

        let mut cursor = Cursor::new(&data[..]);
        let question = DnsQuestion::from_bytes(&mut cursor).unwrap();
        assert_eq!(question.name, "example.com.");
        assert_eq!(question.qtype, RecordType::AAAA);
        assert_eq!(question.qclass, RecordClass::IN);
        assert_eq!(cursor.position() as usize, data.len());
    }

    #[test]
    fn test_unknown_type_is_carried() {
        let data = [1, b'x', 0, 0xFF, 0x00, 0x00, 0xFE];
        let question = DnsQuestion::from_bytes(&mut Cursor::new(&data[..])).unwrap();
        assert_eq!(question.qtype, RecordType(0xFF00));
        assert_eq!(question.qclass, RecordClass(0xFE));
    }

    #[test]
    fn test_truncated_after_name() {
        let data = [1, b'x', 0, 0x00, 0x01, 0x00];
        assert_eq!(
            DnsQuestion::from_bytes(&mut Cursor::new(&data[..])),
            Err(WireError::TruncatedQuestion { offset: 3 })
        );
    }

    #[test]
    fn test_truncated_inside_name() {
        let data = [3, b'w', b'w'];
        assert_eq!(
            DnsQuestion::from_bytes(&mut Cursor::new(&data[..])),
            Err(WireError::TruncatedName { offset: 0 })
        );
    }
}
