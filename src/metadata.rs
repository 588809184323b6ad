//! Container header.
//!
//! ```text
//! [original length: u64 LE][256 varint counts, byte 0 first][payload]
//! ```

use std::io::{self, Read, Write};

use crate::error::{FormatError, HuffmanError, Result};
use crate::frequency::{FrequencyTable, SYMBOL_COUNT};
use crate::varint::{read_varint, write_varint};

/// Size of the original-length field.
pub const LENGTH_FIELD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub original_length: u64,
    pub frequencies: FrequencyTable,
    /// Encoded size of the header in bytes.
    pub header_len: usize,
}

/// Writes the header and returns its encoded size.
pub fn write_header<W: Write>(
    writer: &mut W,
    original_length: u64,
    frequencies: &FrequencyTable,
) -> io::Result<usize> {
    writer.write_all(&original_length.to_le_bytes())?;
    let mut written = LENGTH_FIELD_LEN;
    for &count in frequencies.counts() {
        written += write_varint(writer, count)?;
    }
    Ok(written)
}

/// Reads and validates a header, leaving `reader` at the first payload byte.
pub fn read_header<R: Read>(reader: &mut R) -> Result<ContainerHeader> {
    let mut length_bytes = [0u8; LENGTH_FIELD_LEN];
    reader
        .read_exact(&mut length_bytes)
        .map_err(|e| truncated_or_io(e, "original length"))?;
    let original_length = u64::from_le_bytes(length_bytes);

    let mut counts = [0u64; SYMBOL_COUNT];
    let mut header_len = LENGTH_FIELD_LEN;
    for (slot, count) in counts.iter_mut().enumerate() {
        let mut counting = CountingReader::new(&mut *reader);
        *count = read_varint(&mut counting).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => FormatError::MalformedVarint { slot }.into(),
            _ => truncated_or_io(e, "frequency table"),
        })?;
        header_len += counting.count;
    }

    let frequencies = FrequencyTable::from_counts(counts);
    let actual = frequencies
        .checked_total()
        .ok_or(FormatError::FrequencyOverflow)?;
    if actual != original_length {
        return Err(FormatError::FrequencyMismatch {
            declared: original_length,
            actual,
        }
        .into());
    }

    Ok(ContainerHeader {
        original_length,
        frequencies,
        header_len,
    })
}

fn truncated_or_io(e: io::Error, field: &'static str) -> HuffmanError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        FormatError::TruncatedHeader(field).into()
    } else {
        e.into()
    }
}

struct CountingReader<R> {
    inner: R,
    count: usize,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        CountingReader { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}
