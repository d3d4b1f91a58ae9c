use std::io::Cursor;

use super::{
    DnsHeader, DnsQuestion, RecordClass, RecordType, ResourceRecord, Section, WireError, offset,
};

/// Smallest possible question: root name plus type and class.
const MIN_QUESTION_LEN: usize = 5;

/// Represents a complete DNS message containing header and all sections.
///
/// Messages are produced by [`DnsMessage::from_bytes`] and hold only owned
/// data, so they outlive the buffer they were decoded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsMessage {
    /// The DNS message header containing IDs, flags, and section counts.
    pub header: DnsHeader,
    /// Questions being asked in this DNS message.
    pub questions: Vec<DnsQuestion>,
    /// Answer records provided by the server.
    pub answers: Vec<ResourceRecord>,
    /// Authority records indicating authoritative name servers.
    pub authorities: Vec<ResourceRecord>,
    /// Additional records providing supplementary information.
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Builds a standard recursive query for `name` with a random ID.
    ///
    /// The ID is a correlation token only; read it back from the first two
    /// bytes, or use [`DnsMessage::encode_query_with_id`] to choose it.
    ///
    /// # Errors
    ///
    /// Propagates name encoding errors such as [`WireError::LabelTooLong`].
    pub fn encode_query(name: &str, qtype: RecordType) -> Result<Vec<u8>, WireError> {
        Self::encode_query_with_id(fastrand::u16(..), name, qtype)
    }

    /// Builds a query with an explicit ID: QR=0, Opcode=0, RD=1, one question
    /// of class IN, every other count zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dnsdig::dns::{DnsMessage, RecordType};
    ///
    /// let query =
    ///     DnsMessage::encode_query_with_id(0x7466, "www.yahoo.com", RecordType::A).unwrap();
    /// assert_eq!(&query[..4], &[0x74, 0x66, 0x01, 0x00]);
    /// assert_eq!(query.len(), 12 + 15 + 4);
    /// ```
    pub fn encode_query_with_id(
        id: u16,
        name: &str,
        qtype: RecordType,
    ) -> Result<Vec<u8>, WireError> {
        let header = DnsHeader {
            id,
            recursion_desired: true,
            question_count: 1,
            ..DnsHeader::default()
        };
        let question = DnsQuestion {
            name: name.to_string(),
            qtype,
            qclass: RecordClass::IN,
        };

        let mut buffer = Vec::with_capacity(super::HEADER_LEN + name.len() + 6);
        header.pack(&mut buffer);
        question.pack(&mut buffer)?;
        Ok(buffer)
    }

    /// Deserializes a complete DNS message from a byte slice.
    ///
    /// Sections are read in wire order (questions, answers, authority,
    /// additional) from a single cursor, taking exactly as many entries as the
    /// header announces. Bytes left over afterwards are ignored.
    ///
    /// # Errors
    ///
    /// The first error raised by a header, question, record or name decoder is
    /// returned unchanged. If the buffer ends cleanly between two entries while
    /// the header still announces more, [`WireError::CountMismatch`] is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut cursor = Cursor::new(bytes);
        let header = DnsHeader::from_bytes(&mut cursor)?;

        let questions = decode_section(
            &mut cursor,
            Section::Question,
            header.question_count,
            DnsQuestion::from_bytes,
        )?;
        let answers = decode_section(
            &mut cursor,
            Section::Answer,
            header.answer_count,
            ResourceRecord::from_bytes,
        )?;
        let authorities = decode_section(
            &mut cursor,
            Section::Authority,
            header.authority_count,
            ResourceRecord::from_bytes,
        )?;
        let additionals = decode_section(
            &mut cursor,
            Section::Additional,
            header.additional_count,
            ResourceRecord::from_bytes,
        )?;

        Ok(DnsMessage {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Iterates the answer records of the given type and class.
    pub fn answers_of(
        &self,
        rtype: RecordType,
        rclass: RecordClass,
    ) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .filter(move |rr| rr.rtype == rtype && rr.rclass == rclass)
    }
}

fn decode_section<T>(
    cursor: &mut Cursor<&[u8]>,
    section: Section,
    count: u16,
    decode: fn(&mut Cursor<&[u8]>) -> Result<T, WireError>,
) -> Result<Vec<T>, WireError> {
    let len = cursor.get_ref().len();
    let remaining = len.saturating_sub(offset(cursor));
    // The announced count is untrusted; never reserve more than could fit.
    let mut entries = Vec::with_capacity(usize::from(count).min(remaining / MIN_QUESTION_LEN));

    for decoded in 0..count {
        if offset(cursor) >= len {
            return Err(WireError::CountMismatch {
                section,
                expected: count,
                decoded,
            });
        }
        entries.push(decode(cursor)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::ResponseCode;

    fn hex(s: &str) -> Vec<u8> {
        let digits: Vec<u8> = s.bytes().filter(u8::is_ascii_hexdigit).collect();
        digits
            .chunks(2)
            .map(|pair| {
                let text = std::str::from_utf8(pair).unwrap();
                u8::from_str_radix(text, 16).unwrap()
            })
            .collect()
    }

    const NORTHEASTERN_REPLY: &str = "
        db42 8180 0001 0001 0000 0000
        0377 7777 0c6e 6f72 7468 6561 7374 6572 6e03 6564 7500
        0001 0001
        c00c 0001 0001 0000 0258 0004 9b21 1144";

    #[test]
    fn test_encode_full_query() {
        let query =
            DnsMessage::encode_query_with_id(0x7466, "www.yahoo.com", RecordType::A).unwrap();
        let expected = hex("7466 0100 0001 0000 0000 0000
             03777777 057961686f6f 03636f6d 00
             0001 0001");
        assert_eq!(query, expected);
    }

    #[test]
    fn test_encode_query_random_id_shape() {
        let query = DnsMessage::encode_query("example.com", RecordType::AAAA).unwrap();
        let decoded = DnsMessage::from_bytes(&query).unwrap();
        let header = decoded.header;

        assert!(!header.is_response);
        assert_eq!(header.opcode, 0);
        assert!(header.recursion_desired);
        assert!(!header.authoritative && !header.truncated && !header.recursion_available);
        assert_eq!(header.question_count, 1);
        assert_eq!(
            (header.answer_count, header.authority_count, header.additional_count),
            (0, 0, 0)
        );
        assert_eq!(decoded.questions[0].qtype, RecordType::AAAA);
        assert_eq!(decoded.questions[0].qclass, RecordClass::IN);
    }

    #[test]
    fn test_encode_query_propagates_name_errors() {
        let name = format!("{}.example.com", "a".repeat(64));
        assert!(matches!(
            DnsMessage::encode_query(&name, RecordType::A),
            Err(WireError::LabelTooLong { len: 64, .. })
        ));
    }

    #[test]
    fn test_decode_full_query() {
        let packet = hex("7466 0100 0001 0000 0000 0000
             03777777 057961686f6f 03636f6d 00
             0001 0001");
        let message = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(message.header.id, 0x7466);
        assert!(message.header.recursion_desired);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name, "www.yahoo.com.");
        assert_eq!(message.questions[0].qtype, RecordType::A);
        assert!(message.answers.is_empty());
    }

    #[test]
    fn test_decode_reply_with_compression_pointer() {
        let message = DnsMessage::from_bytes(&hex(NORTHEASTERN_REPLY)).unwrap();

        assert_eq!(message.header.id, 0xdb42);
        assert!(message.header.is_response);
        assert!(message.header.recursion_available);
        assert_eq!(message.header.response_code(), ResponseCode::NoError);

        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name, "www.northeastern.edu.");
        assert_eq!(message.questions[0].qtype, RecordType::A);
        assert_eq!(message.questions[0].qclass, RecordClass::IN);

        assert_eq!(message.answers.len(), 1);
        let answer = &message.answers[0];
        assert_eq!(answer.name, "www.northeastern.edu.");
        assert_eq!(answer.rtype, RecordType::A);
        assert_eq!(answer.rclass, RecordClass::IN);
        assert_eq!(answer.ttl, 600);
        assert_eq!(answer.rdlength(), 4);
        assert_eq!(answer.rdata, vec![155, 33, 17, 68]);

        assert!(message.authorities.is_empty());
        assert!(message.additionals.is_empty());
        assert_eq!(message.answers_of(RecordType::A, RecordClass::IN).count(), 1);
    }

    #[test]
    fn test_truncated_header() {
        let err = DnsMessage::from_bytes(&hex("db42 8180 0001")).unwrap_err();
        assert!(matches!(err, WireError::TruncatedHeader { .. }));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_pointer_beyond_buffer() {
        let wire = hex("db42 0100 0001 0000 0000 0000 c0ff 0001 0001");
        assert_eq!(
            DnsMessage::from_bytes(&wire),
            Err(WireError::InvalidPointer {
                offset: 12,
                target: 0xff
            })
        );
    }

    #[test]
    fn test_self_referencing_pointer() {
        let wire = hex("db42 0100 0001 0000 0000 0000 c00c 0001 0001");
        assert_eq!(
            DnsMessage::from_bytes(&wire),
            Err(WireError::InvalidPointer {
                offset: 12,
                target: 12
            })
        );
    }

    #[test]
    fn test_every_prefix_is_a_truncation() {
        let wire = hex(NORTHEASTERN_REPLY);
        for cut in 0..wire.len() {
            match DnsMessage::from_bytes(&wire[..cut]) {
                Err(err) => assert!(err.is_truncation(), "cut at {cut}: {err:?}"),
                Ok(message) => panic!("cut at {cut} decoded: {message:?}"),
            }
        }
    }

    #[test]
    fn test_count_mismatch_at_entry_boundary() {
        let mut wire = hex(NORTHEASTERN_REPLY);
        wire[7] = 2; // ANCOUNT = 2, only one answer present
        assert_eq!(
            DnsMessage::from_bytes(&wire),
            Err(WireError::CountMismatch {
                section: Section::Answer,
                expected: 2,
                decoded: 1
            })
        );
    }

    #[test]
    fn test_cut_between_sections_reports_owed_count() {
        let wire = hex(NORTHEASTERN_REPLY);
        assert_eq!(
            DnsMessage::from_bytes(&wire[..12]),
            Err(WireError::CountMismatch {
                section: Section::Question,
                expected: 1,
                decoded: 0
            })
        );
        assert_eq!(
            DnsMessage::from_bytes(&wire[..38]),
            Err(WireError::CountMismatch {
                section: Section::Answer,
                expected: 1,
                decoded: 0
            })
        );
    }

    #[test]
    fn test_huge_counts_fail_without_panicking() {
        let wire = hex("0001 8180 ffff ffff ffff ffff");
        assert_eq!(
            DnsMessage::from_bytes(&wire),
            Err(WireError::CountMismatch {
                section: Section::Question,
                expected: 0xffff,
                decoded: 0
            })
        );
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut wire = hex(NORTHEASTERN_REPLY);
        wire.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let message = DnsMessage::from_bytes(&wire).unwrap();
        assert_eq!(message.answers.len(), 1);
    }

    #[test]
    fn test_sections_decode_in_order() {
        // One answer, one authority, one additional; all owner names point at
        // the question name.
        let wire = hex("
            0102 8180 0001 0001 0001 0001
            0161 00 0001 0001
            c00c 0001 0001 0000 0001 0004 0a000001
            c00c 0002 0001 0000 0002 0003 016e 00
            c00c 0010 0001 0000 0003 0002 0178");
        let message = DnsMessage::from_bytes(&wire).unwrap();

        assert_eq!(message.questions[0].name, "a.");
        assert_eq!(message.answers[0].ttl, 1);
        assert_eq!(message.authorities[0].rtype, RecordType::NS);
        assert_eq!(message.authorities[0].ttl, 2);
        assert_eq!(message.additionals[0].rtype, RecordType::TXT);
        assert_eq!(message.additionals[0].rdata, vec![0x01, 0x78]);
    }

    #[test]
    fn test_error_in_later_section_discards_message() {
        let wire = hex("
            0102 8180 0001 0001 0000 0001
            0161 00 0001 0001
            c00c 0001 0001 0000 0001 0004 0a000001
            c0ff 0001 0001 0000 0001 0000");
        assert!(matches!(
            DnsMessage::from_bytes(&wire),
            Err(WireError::InvalidPointer { target: 0xff, .. })
        ));
    }
}
