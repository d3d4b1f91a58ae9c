//! Human-readable rendering of decoded messages.
//!
//! Two layouts are provided: a dig-like [`render_summary`] and an RFC 1035
//! style box [`render_diagram`] that shows every header field and the raw
//! record data. Both are pure functions of the message and the options.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::dns::{DnsHeader, DnsMessage, DnsQuestion, RecordClass, RecordType, ResourceRecord};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const BOLD_CYAN: &str = "\x1b[1;36m";
const WHITE: &str = "\x1b[97m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";

const BOX: &str = "+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+";

/// Hex digits of RDATA per diagram row (16 bytes).
const HEX_ROW: usize = 32;

/// Settings shared by [`render_summary`] and [`render_diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap labels and values in ANSI color escapes.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

impl RenderOptions {
    fn paint(&self, text: &str, color: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Renders `message` the way `dig` prints a reply.
///
/// Empty sections are omitted.
///
/// # Examples
///
/// ```rust
/// use dnsdig::dns::{DnsMessage, RecordType};
/// use dnsdig::render::{render_summary, RenderOptions};
///
/// let query = DnsMessage::encode_query_with_id(1, "example.com", RecordType::MX).unwrap();
/// let message = DnsMessage::from_bytes(&query).unwrap();
/// let text = render_summary(&message, &RenderOptions { color: false });
///
/// assert!(text.contains("status: NOERROR, id: 1"));
/// assert!(text.contains(";example.com.\t\tIN\tMX"));
/// ```
pub fn render_summary(message: &DnsMessage, options: &RenderOptions) -> String {
    let header = &message.header;
    let mut lines = vec![
        format!(
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            opcode_name(header.opcode),
            header.response_code(),
            header.id
        ),
        format!(
            ";; flags:{}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            flag_names(header),
            header.question_count,
            header.answer_count,
            header.authority_count,
            header.additional_count
        ),
    ];

    if !message.questions.is_empty() {
        lines.push(String::new());
        lines.push(options.paint(";; QUESTION SECTION:", BOLD_CYAN));
        for question in &message.questions {
            lines.push(format!(
                ";{}\t\t{}\t{}",
                question.name, question.qclass, question.qtype
            ));
        }
    }

    for (title, records) in record_sections(message) {
        if records.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(options.paint(&format!(";; {title} SECTION:"), BOLD_CYAN));
        for record in records {
            lines.push(format!(
                "{}\t{}\t{}\t{}\t{}",
                record.name,
                record.ttl,
                record.rclass,
                record.rtype,
                options.paint(&rdata_text(record), GREEN)
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Renders `message` as RFC 1035 §4.1 box diagrams, one per header, question
/// and resource record.
pub fn render_diagram(message: &DnsMessage, options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    header_diagram(&mut lines, &message.header, options);

    if !message.questions.is_empty() {
        lines.push(String::new());
        lines.push(options.paint(";; QUESTION SECTION:", BOLD_CYAN));
        for (index, question) in message.questions.iter().enumerate() {
            question_diagram(&mut lines, index, question, options);
        }
    }

    for (title, records) in record_sections(message) {
        if records.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(options.paint(&format!(";; {title} SECTION:"), BOLD_CYAN));
        for (index, record) in records.iter().enumerate() {
            record_diagram(&mut lines, index, record, options);
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn record_sections(message: &DnsMessage) -> [(&'static str, &[ResourceRecord]); 3] {
    [
        ("ANSWER", message.answers.as_slice()),
        ("AUTHORITY", message.authorities.as_slice()),
        ("ADDITIONAL", message.additionals.as_slice()),
    ]
}

fn header_diagram(lines: &mut Vec<String>, header: &DnsHeader, options: &RenderOptions) {
    let bit = |set: bool| u8::from(set);
    let boxed = options.paint(BOX, DIM);

    lines.push(options.paint(";; HEADER", BOLD_CYAN));
    lines.push(boxed.clone());
    lines.push(options.paint(&centered("ID"), WHITE));
    lines.push(options.paint(&centered(&format!("{:#06x}", header.id)), YELLOW));
    lines.push(boxed.clone());
    lines.push(options.paint("|QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |", WHITE));
    lines.push(options.paint(
        &format!(
            "|{:>2}|{:^11}|{:>2}|{:>2}|{:>2}|{:>2}|{:^8}|{:^11}|",
            bit(header.is_response),
            header.opcode,
            bit(header.authoritative),
            bit(header.truncated),
            bit(header.recursion_desired),
            bit(header.recursion_available),
            header.z,
            header.rcode
        ),
        YELLOW,
    ));
    lines.push(boxed.clone());

    for (label, count) in [
        ("QDCOUNT", header.question_count),
        ("ANCOUNT", header.answer_count),
        ("NSCOUNT", header.authority_count),
        ("ARCOUNT", header.additional_count),
    ] {
        lines.push(options.paint(&centered(label), WHITE));
        lines.push(options.paint(&centered(&count.to_string()), YELLOW));
        lines.push(boxed.clone());
    }
}

fn question_diagram(
    lines: &mut Vec<String>,
    index: usize,
    question: &DnsQuestion,
    options: &RenderOptions,
) {
    let boxed = options.paint(BOX, DIM);

    lines.push(boxed.clone());
    lines.push(options.paint(&format!(";; Question {}", index + 1), BOLD_CYAN));
    lines.push(options.paint(&centered("QNAME"), WHITE));
    lines.push(options.paint(&left(&question.name), YELLOW));
    lines.push(boxed.clone());
    lines.push(options.paint(&centered("QTYPE"), WHITE));
    lines.push(options.paint(&left(&type_code(question.qtype)), YELLOW));
    lines.push(boxed.clone());
    lines.push(options.paint(&centered("QCLASS"), WHITE));
    lines.push(options.paint(&left(&class_code(question.qclass)), YELLOW));
    lines.push(boxed);
}

fn record_diagram(
    lines: &mut Vec<String>,
    index: usize,
    record: &ResourceRecord,
    options: &RenderOptions,
) {
    let boxed = options.paint(BOX, DIM);

    lines.push(boxed.clone());
    lines.push(options.paint(&format!(";; RR {}", index + 1), BOLD_CYAN));
    lines.push(options.paint(&centered("NAME"), WHITE));
    lines.push(options.paint(&left(&record.name), YELLOW));
    lines.push(boxed.clone());
    lines.push(options.paint("|      TYPE       |      CLASS      |    TTL    |", WHITE));
    lines.push(options.paint(
        &format!(
            "|{:^17}|{:^17}|{:^11}|",
            type_code(record.rtype),
            class_code(record.rclass),
            record.ttl
        ),
        YELLOW,
    ));
    lines.push(boxed.clone());
    lines.push(options.paint(&centered("RDLENGTH"), WHITE));
    lines.push(options.paint(&centered(&record.rdlength().to_string()), YELLOW));
    lines.push(boxed.clone());
    lines.push(options.paint(&centered("RDATA"), WHITE));

    let hex = upper_hex(&record.rdata);
    if hex.is_empty() {
        lines.push(options.paint(&left("(empty)"), DIM));
    } else {
        // Hex digits are ASCII so byte offsets are char boundaries.
        for start in (0..hex.len()).step_by(HEX_ROW) {
            let end = (start + HEX_ROW).min(hex.len());
            lines.push(options.paint(&left(&hex[start..end]), GREEN));
        }
    }
    lines.push(boxed);
}

fn centered(text: &str) -> String {
    format!("|{text:^47}|")
}

fn left(text: &str) -> String {
    format!("| {text:<45} |")
}

fn type_code(rtype: RecordType) -> String {
    format!("{} ({})", rtype.0, rtype)
}

fn class_code(rclass: RecordClass) -> String {
    format!("{} ({})", rclass.0, rclass)
}

fn upper_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

fn opcode_name(opcode: u8) -> String {
    match opcode {
        0 => "QUERY".to_string(),
        1 => "IQUERY".to_string(),
        2 => "STATUS".to_string(),
        4 => "NOTIFY".to_string(),
        5 => "UPDATE".to_string(),
        other => format!("OPCODE{other}"),
    }
}

fn flag_names(header: &DnsHeader) -> String {
    [
        (header.is_response, " qr"),
        (header.authoritative, " aa"),
        (header.truncated, " tc"),
        (header.recursion_desired, " rd"),
        (header.recursion_available, " ra"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

/// Presentation form of a record's data: addresses for A and AAAA, the
/// RFC 3597 generic `\# <len> <hex>` form for everything else.
fn rdata_text(record: &ResourceRecord) -> String {
    if record.rclass == RecordClass::IN {
        if record.rtype == RecordType::A {
            if let Ok(octets) = <[u8; 4]>::try_from(record.rdata.as_slice()) {
                return Ipv4Addr::from(octets).to_string();
            }
        }
        if record.rtype == RecordType::AAAA {
            if let Ok(octets) = <[u8; 16]>::try_from(record.rdata.as_slice()) {
                return Ipv6Addr::from(octets).to_string();
            }
        }
    }
    if record.rdata.is_empty() {
        return "\\# 0".to_string();
    }
    format!("\\# {} {}", record.rdata.len(), upper_hex(&record.rdata))
}
