use mail_parser::{Addr, Address, MessageParser};

use crate::error::{Error, ParseError, Result, ValidateError};
use crate::utils::iter_join;

/// An RFC 5322 message held in its encoded wire form.
///
/// Reads go through `mail-parser` on demand; the raw bytes stay canonical so
/// that [`Document::as_bytes`] is always exactly what an `APPEND` will carry.
/// Header writes splice the header block in place; full MIME construction
/// belongs to a mail-construction crate.
#[derive(Clone, Debug)]
pub struct Document {
    raw: Vec<u8>,
}

impl Document {
    /// Wraps raw message bytes, verifying they parse as an RFC 5322 message.
    pub fn parse(raw: impl Into<Vec<u8>>) -> Result<Document> {
        let raw = raw.into();
        if MessageParser::default().parse(&raw).is_none() {
            return Err(Error::Parse(ParseError::Document));
        }
        Ok(Document { raw })
    }

    /// A document with no headers and an empty body.
    pub fn empty() -> Document {
        Document {
            raw: b"\r\n".to_vec(),
        }
    }

    /// The encoded wire form.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Consumes the document, returning the encoded wire form.
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// The `Message-ID` header in its angle-bracketed form, if present.
    pub fn message_id(&self) -> Option<String> {
        self.parsed()?.message_id().map(|id| format!("<{}>", id))
    }

    /// The decoded `Subject` header, if present.
    pub fn subject(&self) -> Option<String> {
        self.parsed()?.subject().map(str::to_string)
    }

    /// The `From` addresses, comma-joined, if present.
    pub fn from(&self) -> Option<String> {
        self.parsed()?.from().map(format_addresses)
    }

    /// The `To` addresses, comma-joined, if present.
    pub fn to(&self) -> Option<String> {
        self.parsed()?.to().map(format_addresses)
    }

    /// The `Cc` addresses, comma-joined, if present.
    pub fn cc(&self) -> Option<String> {
        self.parsed()?.cc().map(format_addresses)
    }

    /// The first text body part, transfer-decoded, if present.
    pub fn body_text(&self) -> Option<String> {
        self.parsed()?
            .text_bodies()
            .next()
            .map(|part| String::from_utf8_lossy(part.contents()).into_owned())
    }

    /// An arbitrary header's decoded text value, if present and textual.
    pub fn header(&self, name: &str) -> Option<String> {
        self.parsed()?
            .header(name)
            .and_then(|value| value.as_text())
            .map(str::to_string)
    }

    /// Replaces (or inserts) a header field.
    ///
    /// Any existing fields with the same name are removed, including folded
    /// continuation lines; the new field lands at the end of the header
    /// block. Line breaks in `name` or `value` are rejected, since the
    /// header block is wire data.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        for c in name.chars().chain(value.chars()) {
            if c == '\r' || c == '\n' {
                return Err(Error::Validate(ValidateError(c)));
            }
        }

        let (headers, body) = split_raw(&self.raw);
        let headers = String::from_utf8_lossy(headers);
        let mut kept = String::new();
        let mut skipping = false;
        for line in headers.lines() {
            if line.starts_with(' ') || line.starts_with('\t') {
                // continuation of whatever field came before it
                if !skipping {
                    kept.push_str(line);
                    kept.push_str("\r\n");
                }
                continue;
            }
            skipping = matches!(
                line.split(':').next(),
                Some(field) if field.trim().eq_ignore_ascii_case(name)
            );
            if !skipping {
                kept.push_str(line);
                kept.push_str("\r\n");
            }
        }
        kept.push_str(name);
        kept.push_str(": ");
        kept.push_str(value);
        kept.push_str("\r\n");

        let mut raw = kept.into_bytes();
        raw.extend_from_slice(b"\r\n");
        raw.extend_from_slice(body);
        self.raw = raw;
        Ok(())
    }

    /// Replaces the message body, leaving the header block alone.
    pub fn set_body(&mut self, body: impl AsRef<[u8]>) {
        let (headers, _) = split_raw(&self.raw);
        let mut raw = headers.to_vec();
        raw.extend_from_slice(b"\r\n");
        raw.extend_from_slice(body.as_ref());
        self.raw = raw;
    }

    fn parsed(&self) -> Option<mail_parser::Message<'_>> {
        MessageParser::default().parse(&self.raw)
    }
}

/// Splits raw message bytes at the blank line, returning (header block
/// including its final line break, body). A message without a blank line is
/// all headers.
fn split_raw(raw: &[u8]) -> (&[u8], &[u8]) {
    if raw.starts_with(b"\r\n") {
        return (&[], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&[], &raw[1..]);
    }
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return (&raw[..pos + 2], &raw[pos + 4..]);
    }
    if let Some(pos) = raw.windows(2).position(|w| w == b"\n\n") {
        return (&raw[..pos + 1], &raw[pos + 2..]);
    }
    (raw, &[])
}

fn format_addresses(addresses: &Address<'_>) -> String {
    iter_join(addresses.iter().map(format_address), ", ")
}

fn format_address(addr: &Addr<'_>) -> String {
    match (addr.name(), addr.address()) {
        (Some(name), Some(address)) => format!("{} <{}>", name, address),
        (None, Some(address)) => address.to_string(),
        (Some(name), None) => name.to_string(),
        (None, None) => String::new(),
    }
}
