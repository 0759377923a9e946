//! Entry header decoding.
//!
//! Each entry starts with three lengths. When all three are below 128 they
//! are stored as single bytes, otherwise as varint32s:
//! ```text
//! [shared: varint32]       // Bytes shared with the previous key
//! [non_shared: varint32]   // Length of the key suffix that follows
//! [value_len: varint32]    // Length of the value
//! [key suffix: non_shared bytes]
//! [value: value_len bytes]
//! ```

use integer_encoding::VarInt;

/// Maximum encoded length of a varint32.
pub const MAX_VARINT32_LEN: usize = 5;

/// Smallest possible header: three one-byte lengths.
pub const MIN_ENTRY_HEADER_LEN: usize = 3;

/// The decoded lengths of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    /// Bytes shared with the previous key
    pub shared: u32,
    /// Length of the key suffix stored in this entry
    pub non_shared: u32,
    /// Length of the value
    pub value_len: u32,
    /// Offset of the key suffix in the block buffer
    pub key_offset: usize,
}

impl EntryHeader {
    /// Offset just past the key suffix, where the value starts.
    pub fn value_offset(&self) -> usize {
        self.key_offset + self.non_shared as usize
    }

    /// Offset just past the value, where the next entry starts.
    pub fn end_offset(&self) -> usize {
        self.value_offset() + self.value_len as usize
    }
}

/// Decode the entry header starting at `pos`, reading nothing at or past `limit`.
///
/// Returns `None` if the header is truncated or malformed, or if the key
/// suffix and value it announces do not fit before `limit`.
pub fn decode_entry(data: &[u8], pos: usize, limit: usize) -> Option<EntryHeader> {
    let input = data.get(pos..limit)?;
    if input.len() < MIN_ENTRY_HEADER_LEN {
        return None;
    }

    let (shared, non_shared, value_len) = (input[0] as u32, input[1] as u32, input[2] as u32);
    let (shared, non_shared, value_len, header_len) = if (shared | non_shared | value_len) < 128 {
        (shared, non_shared, value_len, MIN_ENTRY_HEADER_LEN)
    } else {
        let mut header_len = 0;
        let shared = decode_varint32(input, &mut header_len)?;
        let non_shared = decode_varint32(input, &mut header_len)?;
        let value_len = decode_varint32(input, &mut header_len)?;
        (shared, non_shared, value_len, header_len)
    };

    let remaining = (input.len() - header_len) as u64;
    if non_shared as u64 + value_len as u64 > remaining {
        return None;
    }

    Some(EntryHeader { shared, non_shared, value_len, key_offset: pos + header_len })
}

/// Decode one varint32 at `input[*pos..]`, advancing `pos` past it.
fn decode_varint32(input: &[u8], pos: &mut usize) -> Option<u32> {
    let (value, len) = u64::decode_var(&input[*pos..])?;
    if len > MAX_VARINT32_LEN {
        return None;
    }
    let value = u32::try_from(value).ok()?;
    *pos += len;
    Some(value)
}
