//! Bit-level packing over fixed-size buffers.
//!
//! Bits are laid out least significant first within each byte, bytes in
//! stream order. The writer flushes whole bytes to its sink whenever its
//! buffer fills up; the reader refills from its source the same way.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};

/// Bytes one `write_bits` call can touch: 64 bits starting mid-byte.
const MAX_WRITE_SPAN: usize = 9;

fn zeroed(size: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| HuffmanError::allocation(size))?;
    buf.resize(size, 0);
    Ok(buf)
}

#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    buf: Vec<u8>,
    bit_offset: usize,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W, buffer_size: usize) -> Result<Self> {
        Ok(BitWriter {
            sink,
            buf: zeroed(buffer_size.max(MAX_WRITE_SPAN + 1))?,
            bit_offset: 0,
            bits_written: 0,
        })
    }

    /// Appends the low `width` bits of `value`, bit 0 first.
    pub fn write_bits(&mut self, value: u64, width: u32) -> Result<()> {
        debug_assert!(width <= 64);
        if self.bit_offset / 8 + MAX_WRITE_SPAN > self.buf.len() {
            self.flush_full_bytes()?;
        }

        let mut value = value;
        let mut remaining = width.min(64);
        self.bits_written += u64::from(remaining);
        while remaining > 0 {
            let index = self.bit_offset / 8;
            let shift = (self.bit_offset % 8) as u32;
            let take = remaining.min(8 - shift);
            let chunk = (value & ((1u64 << take) - 1)) as u8;
            self.buf[index] |= chunk << shift;

            value = value.checked_shr(take).unwrap_or(0);
            self.bit_offset += take as usize;
            remaining -= take;
        }
        Ok(())
    }

    /// Emits every complete byte and moves the straddling partial byte to
    /// the front of the cleared buffer.
    fn flush_full_bytes(&mut self) -> Result<()> {
        let full = self.bit_offset / 8;
        self.sink.write_all(&self.buf[..full])?;
        log::trace!("bit writer flushed {full} bytes");

        let carry = self.buf.get(full).copied().unwrap_or(0);
        self.buf.fill(0);
        self.buf[0] = carry;
        self.bit_offset %= 8;
        Ok(())
    }

    /// Emits the remaining bytes, the last one zero-padded in its high bits.
    /// Returns the sink and the total number of bits written.
    pub fn finish(mut self) -> Result<(W, u64)> {
        let tail = self.bit_offset.div_ceil(8);
        self.sink.write_all(&self.buf[..tail])?;
        self.sink.flush()?;
        Ok((self.sink, self.bits_written))
    }
}

#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    buf: Vec<u8>,
    filled: usize,
    byte_pos: usize,
    bit_pos: u32,
    bytes_consumed: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R, buffer_size: usize) -> Result<Self> {
        Ok(BitReader {
            source,
            buf: zeroed(buffer_size.max(1))?,
            filled: 0,
            byte_pos: 0,
            bit_pos: 0,
            bytes_consumed: 0,
        })
    }

    /// Next bit in arrival order, `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.byte_pos >= self.filled && !self.refill()? {
            return Ok(None);
        }
        let bit = (self.buf[self.byte_pos] >> self.bit_pos) & 1 == 1;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        Ok(Some(bit))
    }

    fn refill(&mut self) -> Result<bool> {
        loop {
            match self.source.read(&mut self.buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.filled = n;
                    self.byte_pos = 0;
                    self.bytes_consumed += n as u64;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Bytes pulled from the source so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pack(fields: &[(u64, u32)], buffer_size: usize) -> (Vec<u8>, u64) {
        let mut writer = BitWriter::new(Vec::new(), buffer_size).unwrap();
        for &(value, width) in fields {
            writer.write_bits(value, width).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn lsb_first_within_bytes() {
        let (bytes, bits) = pack(&[(0b1, 1), (0b0, 1), (0b11, 2), (0b1010, 4)], 16);
        assert_eq!(bits, 8);
        assert_eq!(bytes, vec![0b1010_1101]);
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        let (bytes, bits) = pack(&[(0b101, 3)], 16);
        assert_eq!(bits, 3);
        assert_eq!(bytes, vec![0b0000_0101]);
    }

    #[test]
    fn wide_values_straddle_bytes() {
        let (bytes, bits) = pack(&[(0b1, 1), (u64::MAX, 64), (0, 7)], 16);
        assert_eq!(bits, 72);
        assert_eq!(bytes, vec![0xff; 8].into_iter().chain([0x01]).collect::<Vec<_>>());
    }

    #[test]
    fn ignores_bits_above_width() {
        let (bytes, _) = pack(&[(0xff, 2), (0, 6)], 16);
        assert_eq!(bytes, vec![0b11]);
    }

    #[test]
    fn flushing_preserves_the_stream() {
        let fields: Vec<(u64, u32)> = (0..2000u64).map(|i| (i * 2654435761, (i % 64) as u32 + 1)).collect();
        let (small, small_bits) = pack(&fields, 16);
        let (large, large_bits) = pack(&fields, 1 << 16);
        assert_eq!(small_bits, large_bits);
        assert_eq!(small, large);
        assert_eq!(small.len() as u64, small_bits.div_ceil(8));
    }

    #[test]
    fn reader_mirrors_writer() {
        let (bytes, bits) = pack(&[(0b1101, 4), (0b0110_0101, 8), (0b1, 1)], 16);
        let mut reader = BitReader::new(Cursor::new(bytes), 1).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = reader.read_bit().unwrap() {
            seen.push(bit as u8);
        }
        assert_eq!(seen.len(), 16);
        assert_eq!(&seen[..13], &[1, 0, 1, 1, 1, 0, 1, 0, 0, 1, 1, 0, 1]);
        assert!(seen[bits as usize..].iter().all(|&b| b == 0));
        assert_eq!(reader.bytes_consumed(), 2);
    }
}
