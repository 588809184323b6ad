use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::arena::HuffNode;
use crate::bit_vec::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::config::CodecConfig;
use crate::error::{FormatError, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata::{read_header, write_header};

/// Size accounting for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStats {
    pub original_len: u64,
    pub header_len: usize,
    /// Code bits in the payload, excluding the final byte's padding.
    pub payload_bits: u64,
    pub compressed_len: u64,
}

impl EncodeStats {
    /// Compressed size relative to the input, 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.compressed_len as f64 / self.original_len as f64
        }
    }
}

/// Static Huffman compressor and decompressor.
///
/// Holds only configuration; every call builds and drops its own tree and
/// buffers.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(HuffmanCodec { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compresses everything from the current position of `source` to its
    /// end into `sink`. The source is read twice: once for frequencies, then
    /// again from the same position for the payload.
    pub fn encode<R, W>(&self, source: R, sink: W) -> Result<u64>
    where
        R: Read + Seek,
        W: Write,
    {
        Ok(self.encode_with_stats(source, sink)?.original_len)
    }

    pub fn encode_with_stats<R, W>(&self, mut source: R, mut sink: W) -> Result<EncodeStats>
    where
        R: Read + Seek,
        W: Write,
    {
        let start = source.stream_position()?;
        let frequencies = FrequencyTable::from_reader(&mut source, self.config.read_buffer_size)?;
        let original_len = frequencies.total();
        source.seek(SeekFrom::Start(start))?;

        let table = self.build_table(&frequencies)?;
        log::debug!(
            "encoding {} bytes, {} distinct symbols, longest code {} bits",
            original_len,
            table.len(),
            table.max_len()
        );

        let header_len = write_header(&mut sink, original_len, &frequencies)?;
        let mut writer = BitWriter::new(sink, self.config.write_buffer_size)?;
        let consumed = self.pack_payload(&mut source, &table, &mut writer)?;
        if consumed != original_len {
            return Err(source_changed(format!(
                "source yielded {consumed} bytes on the second pass, expected {original_len}"
            )));
        }
        let (_, payload_bits) = writer.finish()?;

        let stats = EncodeStats {
            original_len,
            header_len,
            payload_bits,
            compressed_len: header_len as u64 + payload_bits.div_ceil(8),
        };
        log::debug!(
            "encoded {} -> {} bytes ({:.1}%)",
            stats.original_len,
            stats.compressed_len,
            stats.ratio() * 100.0
        );
        Ok(stats)
    }

    /// The tree only lives until the code table is built.
    fn build_table(&self, frequencies: &FrequencyTable) -> Result<CodeTable> {
        let tree = HuffmanTree::with_arena_capacity(frequencies, self.config.arena_capacity)?;
        tree.generate_table()
    }

    fn pack_payload<R: Read, W: Write>(
        &self,
        source: &mut R,
        table: &CodeTable,
        writer: &mut BitWriter<W>,
    ) -> Result<u64> {
        let mut chunk = vec![0u8; self.config.read_buffer_size];
        let mut consumed = 0u64;
        loop {
            let read = match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &chunk[..read] {
                let code = table.get(byte).ok_or_else(|| {
                    source_changed(format!("byte {byte} was not seen on the first pass"))
                })?;
                writer.write_bits(code.reversed(), u32::from(code.len))?;
            }
            consumed += read as u64;
        }
        Ok(consumed)
    }

    /// Decompresses one container from `source` into `sink`.
    ///
    /// Reads exactly the container's bytes and no further, so containers
    /// written back to back can be decoded one call at a time from the same
    /// stream. The header is read a byte at a time; wrap unbuffered sources
    /// in a `BufReader` first.
    pub fn decode<R, W>(&self, mut source: R, mut sink: W) -> Result<()>
    where
        R: Read,
        W: Write,
    {
        let header = read_header(&mut source)?;
        let declared = header.original_length;
        log::debug!(
            "decoding {} bytes from a {} byte header",
            declared,
            header.header_len
        );

        if declared == 0 {
            sink.flush()?;
            return Ok(());
        }

        let tree =
            HuffmanTree::with_arena_capacity(&header.frequencies, self.config.arena_capacity)?;
        let root = tree.root().ok_or(FormatError::TruncatedPayload {
            declared,
            decoded: 0,
        })?;

        let payload_len = u64::try_from(tree.payload_bits().div_ceil(8)).unwrap_or(u64::MAX);
        let mut reader = BitReader::new(source.take(payload_len), self.config.read_buffer_size)?;
        let mut out = Vec::with_capacity(self.config.write_buffer_size);
        let mut decoded = 0u64;
        let mut node = root;

        while decoded < declared {
            let Some(bit) = reader.read_bit()? else {
                log::warn!("payload exhausted after {decoded} of {declared} symbols");
                return Err(FormatError::TruncatedPayload { declared, decoded }.into());
            };
            node = tree.step(node, bit);
            match tree.node(node) {
                HuffNode::Internal { .. } => continue,
                HuffNode::Leaf {
                    synthetic: true, ..
                } => {
                    log::warn!("payload selected a placeholder leaf at symbol {decoded}");
                    return Err(FormatError::UnreachableLeaf.into());
                }
                HuffNode::Leaf { byte, .. } => {
                    out.push(*byte);
                    decoded += 1;
                    node = root;
                    if out.len() >= self.config.write_buffer_size {
                        sink.write_all(&out)?;
                        out.clear();
                    }
                }
            }
        }

        sink.write_all(&out)?;
        sink.flush()?;
        log::debug!(
            "decoded {} bytes from {} payload bytes",
            decoded,
            reader.bytes_consumed()
        );
        Ok(())
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(Cursor::new(data), &mut out)?;
        Ok(out)
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode(data, &mut out)?;
        Ok(out)
    }
}

fn source_changed(message: String) -> HuffmanError {
    io::Error::new(io::ErrorKind::InvalidData, message).into()
}
