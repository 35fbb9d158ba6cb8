//! Big-endian helpers for the handshake wire format
//!
//! Readers return `None` instead of panicking when the input is too short, so
//! that the codec can turn truncation into a structured error.

/// Read a u16 in big-endian byte order starting at `offset`
pub fn u16_from_be_at(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let chunk = bytes.get(offset..end)?;
    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
}

/// Read a u32 in big-endian byte order starting at `offset`
pub fn u32_from_be_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let chunk = bytes.get(offset..end)?;
    Some(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Append a u16 in big-endian byte order
pub fn put_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append a u32 in big-endian byte order
pub fn put_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append `bytes` prefixed with its length as a big-endian u32
///
/// Inputs longer than `u32::MAX` are a caller bug; the wire limits in
/// `kagree-params` keep every field far below that.
pub fn put_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    put_u32_be(out, bytes.len() as u32);
    out.extend_from_slice(bytes);
}
