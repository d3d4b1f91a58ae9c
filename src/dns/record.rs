use std::io::Cursor;

use super::{
    RecordClass, RecordType, WireError, offset, read_u16, read_u32, take, unpack_domain_name,
};

/// Represents a DNS resource record in the answer, authority, or additional sections.
///
/// The record data is kept as raw bytes: the codec does not interpret
/// type-specific payloads. RDLENGTH is not stored separately since it is always
/// `rdata.len()`; see [`ResourceRecord::rdlength`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// The owner name of the record, rooted.
    pub name: String,
    /// The type of this resource record.
    pub rtype: RecordType,
    /// The record class, typically [`RecordClass::IN`].
    pub rclass: RecordClass,
    /// Time-to-live in seconds.
    pub ttl: u32,
    /// The record data exactly as received, copied out of the message buffer.
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    /// Length of the record data, as carried in the RDLENGTH field.
    pub fn rdlength(&self) -> u16 {
        self.rdata.len() as u16
    }

    /// Deserializes a DNS resource record at the cursor position.
    ///
    /// # Errors
    ///
    /// Name decoding errors are returned unchanged. [`WireError::TruncatedRecord`]
    /// is returned when any fixed field, or the RDLENGTH bytes of data it
    /// announces, runs past the end of the buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dnsdig::dns::{RecordType, ResourceRecord};
    /// use std::io::Cursor;
    ///
    /// let data = [
    ///     0,          // root owner name
    ///     0, 1,       // type A
    ///     0, 1,       // class IN
    ///     0, 0, 0, 60, // TTL
    ///     0, 4,       // RDLENGTH
    ///     192, 0, 2, 1,
    /// ];
    /// let record = ResourceRecord::from_bytes(&mut Cursor::new(&data[..])).unwrap();
    ///
    /// assert_eq!(record.rtype, RecordType::A);
    /// assert_eq!(record.ttl, 60);
    /// assert_eq!(record.rdata, vec![192, 0, 2, 1]);
    /// ```
    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let name = unpack_domain_name(cursor)?;

        let fixed_at = offset(cursor);
        let truncated = || WireError::TruncatedRecord { offset: fixed_at };

        let rtype = read_u16(cursor).ok_or_else(truncated)?;
        let rclass = read_u16(cursor).ok_or_else(truncated)?;
        let ttl = read_u32(cursor).ok_or_else(truncated)?;
        let rdlength = read_u16(cursor).ok_or_else(truncated)?;
        let rdata = take(cursor, rdlength as usize).ok_or_else(truncated)?;

        Ok(ResourceRecord {
            name,
            rtype: RecordType(rtype),
            rclass: RecordClass(rclass),
            ttl,
            rdata: rdata.to_vec(),
        })
    }
}
