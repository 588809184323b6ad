//! # huffstream
//!
//! Static Huffman compression for arbitrary byte streams.
//!
//! The input is scanned once to count byte frequencies, a prefix tree is
//! built from the counts, and every byte is then replaced by its code. The
//! container stores the counts so the decoder can rebuild the same tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffstream::HuffmanCodec;
//! use std::io::Cursor;
//!
//! let codec = HuffmanCodec::default();
//!
//! let mut compressed = Vec::new();
//! codec.encode(Cursor::new(b"abracadabra"), &mut compressed)?;
//!
//! let mut restored = Vec::new();
//! codec.decode(compressed.as_slice(), &mut restored)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), huffstream::HuffmanError>(())
//! ```

pub mod code_table;
pub mod compressed_data;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod varint;

// Internal modules - not part of public API
mod arena;
mod bit_vec;
mod min_heap;

pub use arena::{HuffNode, NodeId};
pub use code_table::{CodeTable, PrefixCode};
pub use compressed_data::CompressedData;
pub use config::CodecConfig;
pub use error::{FormatError, HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{EncodeStats, HuffmanCodec};
pub use hufftree::HuffmanTree;

/// Compresses `data` with the default configuration.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().compress(data)
}

/// Decompresses a container produced by [`compress`] or
/// [`HuffmanCodec::encode`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::default().decompress(data)
}
