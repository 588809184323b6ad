use std::io::Cursor;

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata::{read_header, write_header};

/// A whole container held in memory, split into its parts.
///
/// Useful for inspecting a container without decoding its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub original_length: u64,
    pub frequencies: FrequencyTable,
    pub payload: Vec<u8>,
}

impl CompressedData {
    /// Parses and validates the header; the payload is taken as is.
    pub fn parse(bytes: &[u8]) -> Result<CompressedData> {
        let mut cursor = Cursor::new(bytes);
        let header = read_header(&mut cursor)?;
        Ok(CompressedData {
            original_length: header.original_length,
            frequencies: header.frequencies,
            payload: bytes[header.header_len..].to_vec(),
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        write_header(&mut bytes, self.original_length, &self.frequencies)?;
        bytes.extend_from_slice(&self.payload);
        Ok(bytes)
    }

    /// Number of payload bits that carry codes; the rest of the last byte is
    /// padding.
    pub fn payload_bits(&self) -> Result<u128> {
        Ok(HuffmanTree::from_frequencies(&self.frequencies)?.payload_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, HuffmanError};

    #[test]
    fn parse_splits_header_from_payload() {
        let mut bytes = Vec::new();
        let freqs = FrequencyTable::from_bytes(b"ab");
        write_header(&mut bytes, 2, &freqs).unwrap();
        bytes.push(0b10);

        let parsed = CompressedData::parse(&bytes).unwrap();
        assert_eq!(parsed.original_length, 2);
        assert_eq!(parsed.frequencies, freqs);
        assert_eq!(parsed.payload, vec![0b10]);
        assert_eq!(parsed.payload_bits().unwrap(), 2);
        assert_eq!(parsed.serialize().unwrap(), bytes);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = CompressedData::parse(b"nope").unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::Format(FormatError::TruncatedHeader(_))
        ));
    }
}
