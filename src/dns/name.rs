//! Domain name label encoding with compression-pointer support.

use std::io::Cursor;

use super::{WireError, offset};

/// Longest label allowed by RFC 1035 §2.3.4.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest name allowed by RFC 1035 §2.3.4.
pub const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 128;

const POINTER_MASK: u8 = 0b1100_0000;

/// Encodes a domain name into DNS label format and appends it to a buffer.
///
/// Converts a human-readable domain name like "www.google.com" into the DNS wire format
/// where each label is prefixed by its length: `\x03www\x06google\x03com\x00`.
/// A single trailing dot is accepted, and both `""` and `"."` encode the root name
/// as a lone zero byte. On error nothing is appended.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::pack_domain_name;
///
/// let mut buffer = Vec::new();
/// pack_domain_name(&mut buffer, "www.example.com.").unwrap();
///
/// assert_eq!(buffer[0], 3); // Length of "www"
/// assert_eq!(&buffer[1..4], b"www");
/// assert_eq!(buffer[4], 7); // Length of "example"
/// assert_eq!(buffer.last(), Some(&0)); // Root terminator
/// ```
///
/// # Errors
///
/// - [`WireError::EmptyLabel`] for names such as `"a..b"` or `".a"`
/// - [`WireError::LabelTooLong`] when a label exceeds 63 bytes
/// - [`WireError::NameTooLong`] when the encoded name exceeds 255 bytes
pub fn pack_domain_name(buffer: &mut Vec<u8>, domain: &str) -> Result<(), WireError> {
    let encoded = encode_name(domain)?;
    buffer.extend_from_slice(&encoded);
    Ok(())
}

/// Encodes a domain name into a fresh buffer. See [`pack_domain_name`].
pub fn encode_name(domain: &str) -> Result<Vec<u8>, WireError> {
    let relative = domain.strip_suffix('.').unwrap_or(domain);
    let mut encoded = Vec::with_capacity(relative.len() + 2);

    if !relative.is_empty() {
        for label in relative.split('.') {
            let len = label.len();
            if len == 0 {
                return Err(WireError::EmptyLabel {
                    name: domain.to_string(),
                });
            }
            if len > MAX_LABEL_LEN {
                return Err(WireError::LabelTooLong {
                    label: label.to_string(),
                    len,
                });
            }
            encoded.push(len as u8);
            encoded.extend_from_slice(label.as_bytes());
        }
    }
    encoded.push(0);

    if encoded.len() > MAX_NAME_LEN {
        return Err(WireError::NameTooLong { len: encoded.len() });
    }
    Ok(encoded)
}

/// Decodes a domain name from DNS wire format, following compression pointers.
///
/// The cursor must wrap the *whole* message since pointers are offsets from its
/// first byte. The name is returned rooted (`"www.example.com."`, or `"."` for
/// the root) with label case preserved.
///
/// ```text
/// Format of a compression pointer:
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// | 1  1|                OFFSET                   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// A pointer must target an offset strictly before its own position, so every
/// jump moves backwards and a chain cannot cycle. At most [`MAX_POINTER_HOPS`]
/// pointers are followed per name.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::unpack_domain_name;
/// use std::io::Cursor;
///
/// let data = [
///     7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', // "example" at offset 0
///     3, b'c', b'o', b'm',                          // "com"
///     0,                                            // root
///     3, b'w', b'w', b'w',                          // "www" at offset 13
///     0xC0, 0x00,                                   // pointer to offset 0
/// ];
///
/// let mut cursor = Cursor::new(&data[..]);
/// cursor.set_position(13);
/// assert_eq!(unpack_domain_name(&mut cursor).unwrap(), "www.example.com.");
/// assert_eq!(cursor.position(), 19); // just past the pointer
/// ```
///
/// # Cursor Position
///
/// On success the cursor sits after the terminating zero byte, or after the
/// first pointer if the name was compressed. On error it is left unchanged.
pub fn unpack_domain_name(cursor: &mut Cursor<&[u8]>) -> Result<String, WireError> {
    let buf: &[u8] = *cursor.get_ref();
    let mut pos = offset(cursor);
    let mut labels: Vec<String> = Vec::new();
    let mut name_len = 0usize;
    let mut resume_at: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let len_byte = *buf.get(pos).ok_or(WireError::TruncatedName { offset: pos })?;

        match len_byte & POINTER_MASK {
            0b0000_0000 => {
                if len_byte == 0 {
                    pos += 1;
                    break;
                }

                let len = len_byte as usize;
                let start = pos + 1;
                let label = buf
                    .get(start..start + len)
                    .ok_or(WireError::TruncatedName { offset: pos })?;

                if !labels.is_empty() {
                    name_len += 1;
                }
                name_len += len;
                if name_len > MAX_NAME_LEN {
                    return Err(WireError::NameTooLong { len: name_len });
                }

                labels.push(String::from_utf8_lossy(label).into_owned());
                pos = start + len;
            }
            POINTER_MASK => {
                let low = *buf
                    .get(pos + 1)
                    .ok_or(WireError::TruncatedName { offset: pos })?;
                let target = (((len_byte & !POINTER_MASK) as usize) << 8) | low as usize;

                if target >= buf.len() || target >= pos {
                    return Err(WireError::InvalidPointer {
                        offset: pos,
                        target,
                    });
                }

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(WireError::CompressionLoop {
                        hops: MAX_POINTER_HOPS,
                    });
                }

                resume_at.get_or_insert(pos + 2);
                pos = target;
            }
            _ => {
                // 0b01 and 0b10 prefixes are reserved (RFC 1035 §4.1.4).
                return Err(WireError::InvalidLabelEncoding {
                    offset: pos,
                    byte: len_byte,
                });
            }
        }
    }

    cursor.set_position(resume_at.unwrap_or(pos) as u64);

    if labels.is_empty() {
        return Ok(".".to_string());
    }
    let mut name = labels.join(".");
    name.push('.');
    Ok(name)
}
