use std::io::{self, Read};

/// Number of distinct byte values.
pub const SYMBOL_COUNT: usize = 256;

/// Occurrence count of every byte value in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable {
            counts: [0; SYMBOL_COUNT],
        }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: [u64; SYMBOL_COUNT]) -> Self {
        FrequencyTable { counts }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.observe(bytes);
        table
    }

    /// Scans `reader` to the end in chunks of `chunk_size` bytes.
    pub fn from_reader<R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Self> {
        let mut table = Self::new();
        let mut chunk = vec![0u8; chunk_size.max(1)];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.observe(&chunk[..read]);
        }
        Ok(table)
    }

    pub fn observe(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn counts(&self) -> &[u64; SYMBOL_COUNT] {
        &self.counts
    }

    /// Sum of all counts, `None` if it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
    }

    /// Number of bytes observed. Saturates for tables that did not come from
    /// a real scan.
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Number of byte values with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Nonzero entries in ascending byte order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(byte, count)| (byte as u8, *count))
    }
}
