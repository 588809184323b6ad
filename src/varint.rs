//! Base-128 variable length integers.
//!
//! Each byte carries 7 value bits, least significant group first. The high
//! bit is set on every byte except the last one of a value.

use std::io::{self, Read, Write};

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

const GROUP_MASK: u8 = 0x7f;
const CONTINUATION: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Input ended while a continuation bit was still set.
    Truncated,
    /// More than ten groups, or bits beyond the 64th.
    Overflow,
}

/// Encodes `value` into `buf`, returning the number of bytes used.
pub fn encode_varint(mut value: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut len = 0;
    loop {
        let group = (value as u8) & GROUP_MASK;
        value >>= 7;
        if value == 0 {
            buf[len] = group;
            return len + 1;
        }
        buf[len] = group | CONTINUATION;
        len += 1;
    }
}

/// Number of bytes [`encode_varint`] produces for `value`.
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

pub fn write_varint<W: Write>(writer: &mut W, value: u64) -> io::Result<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_varint(value, &mut buf);
    writer.write_all(&buf[..len])?;
    Ok(len)
}

/// Decodes one value from the front of `bytes`, returning it with the number
/// of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value = 0u64;
    for (index, &byte) in bytes.iter().enumerate() {
        value |= accumulate(index, byte)?;
        if byte & CONTINUATION == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(VarintError::Truncated)
}

/// Streaming counterpart of [`decode_varint`]. End of input inside a value is
/// reported as [`io::ErrorKind::UnexpectedEof`], an overlong value as
/// [`io::ErrorKind::InvalidData`].
pub fn read_varint<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut value = 0u64;
    let mut byte = [0u8; 1];
    for index in 0..MAX_VARINT_LEN {
        reader.read_exact(&mut byte)?;
        value |= accumulate(index, byte[0])
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "varint overflows u64"))?;
        if byte[0] & CONTINUATION == 0 {
            return Ok(value);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "varint longer than 10 bytes",
    ))
}

fn accumulate(index: usize, byte: u8) -> Result<u64, VarintError> {
    let group = u64::from(byte & GROUP_MASK);
    match index {
        0..=8 => Ok(group << (7 * index)),
        // only one value bit is left for the tenth group
        9 if group <= 1 && byte & CONTINUATION == 0 => Ok(group << 63),
        _ => Err(VarintError::Overflow),
    }
}
