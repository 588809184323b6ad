use crate::error::{HuffmanError, Result};

/// Smallest buffer accepted for either direction. The packer needs room for a
/// full 64-bit write past its flush threshold.
pub const MIN_BUFFER_SIZE: usize = 16;

/// A tree over 256 symbols never needs more than `2 * 256 - 1` nodes.
pub const MIN_ARENA_CAPACITY: usize = 511;

/// Tunables for one [`HuffmanCodec`](crate::HuffmanCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Chunk size used when scanning or decoding the source.
    pub read_buffer_size: usize,
    /// Size of the packed or decoded output buffer before it is flushed.
    pub write_buffer_size: usize,
    /// Node slots reserved for the tree arena.
    pub arena_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024,
            write_buffer_size: 1024,
            arena_capacity: 512,
        }
    }
}

impl CodecConfig {
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    pub fn with_write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = size;
        self
    }

    pub fn with_arena_capacity(mut self, capacity: usize) -> Self {
        self.arena_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_size < MIN_BUFFER_SIZE {
            return Err(HuffmanError::config(format!(
                "read_buffer_size must be at least {MIN_BUFFER_SIZE}, got {}",
                self.read_buffer_size
            )));
        }
        if self.write_buffer_size < MIN_BUFFER_SIZE {
            return Err(HuffmanError::config(format!(
                "write_buffer_size must be at least {MIN_BUFFER_SIZE}, got {}",
                self.write_buffer_size
            )));
        }
        if self.arena_capacity < MIN_ARENA_CAPACITY {
            return Err(HuffmanError::config(format!(
                "arena_capacity must be at least {MIN_ARENA_CAPACITY}, got {}",
                self.arena_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_buffers() {
        let config = CodecConfig::default().with_write_buffer_size(8);
        assert!(matches!(config.validate(), Err(HuffmanError::Config { .. })));

        let config = CodecConfig::default().with_read_buffer_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_undersized_arena() {
        let config = CodecConfig::default().with_arena_capacity(256);
        assert!(config.validate().is_err());
        assert!(CodecConfig::default().with_arena_capacity(511).validate().is_ok());
    }
}
