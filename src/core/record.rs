//! Record framing for `.lang` bodies.
//!
//! After the 8-byte header, a body is a gapless run of records:
//!
//! ```text
//! u16 LE   tag length T (bytes)
//! [u8; T]  tag, segments separated by '/'
//! u16 LE   text length L (code units)
//! [u8; 2L] text, one LE code unit per character
//! ```
//!
//! There is no end marker, so every declared length is checked against the
//! remaining buffer before it is read.
use bstr::ByteSlice;
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::header::{LANG_HEADER_LEN, LangHeader, read_u16};
use crate::core::ucs2;

pub const TAG_SEPARATOR: u8 = b'/';

/// One flattened `(path, text)` pair.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Entry {
    pub path: Vec<String>,
    pub text: String,
}

impl Entry {
    pub fn new(path: Vec<String>, text: impl Into<String>) -> Self {
        Self {
            path,
            text: text.into(),
        }
    }

    /// Builds an entry from a `/`-joined tag, keeping empty segments.
    pub fn from_tag(tag: &str, text: impl Into<String>) -> Self {
        Self::new(split_tag(tag.as_bytes()), text)
    }

    pub fn tag(&self) -> String {
        self.path.join("/")
    }
}

/// Splits raw tag bytes on `/`. Empty segments are preserved; invalid UTF-8 is replaced.
pub fn split_tag(tag: &[u8]) -> Vec<String> {
    tag.split(|byte| *byte == TAG_SEPARATOR)
        .map(|segment| segment.to_str_lossy().into_owned())
        .collect()
}

/// Decodes a whole `.lang` buffer into entries in file order.
///
/// Buffers of 8 bytes or fewer carry no records and yield no entries.
pub fn decode(buf: &[u8]) -> Result<Vec<Entry>, Error> {
    if buf.len() <= LANG_HEADER_LEN {
        debug!(len = buf.len(), "lang buffer holds no records");
        return Ok(Vec::new());
    }
    let header = LangHeader::decode(buf)?;
    let body_len = buf.len() - LANG_HEADER_LEN;
    if header.body_len() == Some(body_len) {
        debug!(body_len, entry_count = header.entry_count, "skipping lang header");
    } else {
        debug!(
            size_field = header.size_field,
            entry_count = header.entry_count,
            body_len,
            "lang header size does not match body; ignoring it"
        );
    }

    let mut reader = RecordReader::new(buf, LANG_HEADER_LEN);
    let mut entries = Vec::new();
    while !reader.is_done() {
        let entry = reader.next_record()?;
        entries.push(entry);
        reader.index += 1;
    }
    Ok(entries)
}

/// Encodes entries as a complete `.lang` buffer: header followed by body.
pub fn encode(entries: &[Entry]) -> Result<Vec<u8>, Error> {
    let body = encode_body(entries)?;
    let header = LangHeader::for_body(body.len(), entries.len())?;
    let mut out = Vec::with_capacity(LANG_HEADER_LEN + body.len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Encodes entries as a headerless body, in the given order.
pub fn encode_body(entries: &[Entry]) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    for entry in entries {
        encode_record(entry, &mut body)?;
    }
    Ok(body)
}

fn encode_record(entry: &Entry, out: &mut Vec<u8>) -> Result<(), Error> {
    let tag = entry.tag();
    let tag_len = u16::try_from(tag.len()).map_err(|_| {
        Error::new(ErrorKind::Oversized)
            .with_message(format!("tag is {} bytes, limit is {}", tag.len(), u16::MAX))
            .with_hint(format!("tag: {}", truncate_for_display(&tag)))
    })?;
    out.extend_from_slice(&tag_len.to_le_bytes());
    out.extend_from_slice(tag.as_bytes());

    let len_at = out.len();
    out.extend_from_slice(&[0, 0]);
    let units = ucs2::encode_units(&entry.text, out);
    let text_len = u16::try_from(units).map_err(|_| {
        Error::new(ErrorKind::Oversized)
            .with_message(format!("text is {units} characters, limit is {}", u16::MAX))
            .with_hint(format!("tag: {}", truncate_for_display(&tag)))
    })?;
    out[len_at..len_at + 2].copy_from_slice(&text_len.to_le_bytes());
    Ok(())
}

fn truncate_for_display(tag: &str) -> String {
    const MAX_CHARS: usize = 64;
    if tag.chars().count() <= MAX_CHARS {
        return tag.to_string();
    }
    let mut out: String = tag.chars().take(MAX_CHARS).collect();
    out.push_str("...");
    out
}

struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
    index: u64,
}

impl<'a> RecordReader<'a> {
    fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos, index: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn next_record(&mut self) -> Result<Entry, Error> {
        let tag_len = self.read_len("tag length")? as usize;
        let tag = self.take(tag_len, "tag")?;
        let text_len = self.read_len("text length")? as usize;
        let text = self.take(text_len * 2, "text")?;
        debug!(
            record = self.index,
            tag = %tag.as_bstr(),
            units = text_len,
            "decoded lang record"
        );
        Ok(Entry::new(split_tag(tag), ucs2::decode_units(text)))
    }

    fn read_len(&mut self, what: &str) -> Result<u16, Error> {
        let bytes = self.take(2, what)?;
        Ok(read_u16(bytes, 0))
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], Error> {
        let remaining = self.buf.len() - self.pos;
        if len > remaining {
            return Err(Error::new(ErrorKind::TruncatedRecord)
                .with_message(format!(
                    "{what} needs {len} bytes but only {remaining} remain"
                ))
                .with_record(self.index)
                .with_offset(self.pos as u64));
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }
}
