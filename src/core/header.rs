// Fixed 8-byte `.lang` header and little-endian field helpers.
use crate::core::error::{Error, ErrorKind};

pub const LANG_HEADER_LEN: usize = 8;
/// Legacy writers store `body_len + 4` in the size field, not `body_len + 8`.
pub const SIZE_FIELD_BIAS: u32 = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LangHeader {
    pub size_field: u32,
    pub entry_count: u32,
}

impl LangHeader {
    pub fn for_body(body_len: usize, entry_count: usize) -> Result<Self, Error> {
        let size_field = u32::try_from(body_len)
            .ok()
            .and_then(|len| len.checked_add(SIZE_FIELD_BIAS))
            .ok_or_else(|| {
                Error::new(ErrorKind::Oversized)
                    .with_message(format!("body of {body_len} bytes does not fit the size field"))
            })?;
        let entry_count = u32::try_from(entry_count).map_err(|_| {
            Error::new(ErrorKind::Oversized)
                .with_message(format!("{entry_count} entries do not fit the count field"))
        })?;
        Ok(Self {
            size_field,
            entry_count,
        })
    }

    pub fn encode(&self) -> [u8; LANG_HEADER_LEN] {
        let mut buf = [0u8; LANG_HEADER_LEN];
        write_u32(&mut buf, 0, self.size_field);
        write_u32(&mut buf, 4, self.entry_count);
        buf
    }

    /// Reads the header fields without judging them; decoding never trusts them.
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < LANG_HEADER_LEN {
            return Err(Error::new(ErrorKind::TruncatedRecord)
                .with_message("header too small")
                .with_offset(0));
        }
        Ok(Self {
            size_field: read_u32(buf, 0),
            entry_count: read_u32(buf, 4),
        })
    }

    pub fn body_len(&self) -> Option<usize> {
        self.size_field
            .checked_sub(SIZE_FIELD_BIAS)
            .map(|len| len as usize)
    }
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut out = [0u8; 4];
    out.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(out)
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
