use thiserror::Error;

/// The section of a DNS message an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Question section (QDCOUNT).
    Question,
    /// Answer section (ANCOUNT).
    Answer,
    /// Authority section (NSCOUNT).
    Authority,
    /// Additional section (ARCOUNT).
    Additional,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Question => "question",
            Section::Answer => "answer",
            Section::Authority => "authority",
            Section::Additional => "additional",
        };
        f.write_str(name)
    }
}

/// Errors raised while encoding or decoding DNS wire data.
///
/// Every decode error is fatal to the call that raised it: the partially
/// decoded message is dropped and the error is returned as-is. Offsets are
/// byte positions from the start of the message buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Fewer than 12 bytes were available for the header.
    #[error("header truncated: need 12 bytes at offset {offset}, {available} available")]
    TruncatedHeader { offset: usize, available: usize },

    /// A question's type or class runs past the buffer.
    #[error("question truncated at offset {offset}")]
    TruncatedQuestion { offset: usize },

    /// A record's fixed fields or RDATA run past the buffer.
    #[error("resource record truncated at offset {offset}")]
    TruncatedRecord { offset: usize },

    /// A name runs past the buffer before its terminator.
    #[error("domain name truncated at offset {offset}")]
    TruncatedName { offset: usize },

    /// A length byte uses the reserved 0b01 or 0b10 prefix.
    #[error("invalid label length byte 0x{byte:02x} at offset {offset}")]
    InvalidLabelEncoding { offset: usize, byte: u8 },

    /// A pointer targets its own offset, a later one, or past the buffer.
    #[error("compression pointer at offset {offset} targets invalid offset {target}")]
    InvalidPointer { offset: usize, target: usize },

    /// Too many pointers were followed for one name.
    #[error("compression chain exceeded {hops} pointer hops")]
    CompressionLoop { hops: usize },

    /// A name exceeds 255 bytes.
    #[error("domain name is {len} bytes long, limit is 255")]
    NameTooLong { len: usize },

    /// A label exceeds 63 bytes.
    #[error("label '{label}' is {len} bytes long, limit is 63")]
    LabelTooLong { label: String, len: usize },

    /// A name to encode has an empty label, as in `"a..b"`.
    #[error("domain name '{name}' contains an empty label")]
    EmptyLabel { name: String },

    /// The message ended between entries while the header still owed some.
    #[error("header announces {expected} {section} entries but the message ends after {decoded}")]
    CountMismatch {
        section: Section,
        expected: u16,
        decoded: u16,
    },
}

impl WireError {
    /// Returns `true` when the message ended before the header's claims
    /// were met.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            WireError::TruncatedHeader { .. }
                | WireError::TruncatedQuestion { .. }
                | WireError::TruncatedRecord { .. }
                | WireError::TruncatedName { .. }
                | WireError::CountMismatch { .. }
        )
    }
}
