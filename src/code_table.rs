use crate::frequency::{FrequencyTable, SYMBOL_COUNT};

/// Root-to-leaf path of one symbol.
///
/// `bits` holds `len` significant bits with the root's decision in the most
/// significant of them; 0 selects the left child, 1 the right child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixCode {
    pub bits: u64,
    pub len: u8,
}

impl PrefixCode {
    pub const EMPTY: PrefixCode = PrefixCode { bits: 0, len: 0 };

    /// Longest path a code can hold.
    pub const MAX_LEN: u8 = 64;

    /// Path extended by one decision, `None` past [`Self::MAX_LEN`].
    pub fn descend(self, right: bool) -> Option<PrefixCode> {
        if self.len >= Self::MAX_LEN {
            return None;
        }
        Some(PrefixCode {
            bits: (self.bits << 1) | u64::from(right),
            len: self.len + 1,
        })
    }

    /// Same path with the root decision in bit 0, the order the packer
    /// emits bits in.
    pub fn reversed(self) -> u64 {
        if self.len == 0 {
            return 0;
        }
        self.bits.reverse_bits() >> (64 - u32::from(self.len))
    }

    /// True when `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &PrefixCode) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

/// Code assigned to each byte value that occurs in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<PrefixCode>; SYMBOL_COUNT],
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable {
            codes: [None; SYMBOL_COUNT],
        }
    }
}

impl CodeTable {
    pub fn insert(&mut self, byte: u8, code: PrefixCode) {
        self.codes[byte as usize] = Some(code);
    }

    pub fn get(&self, byte: u8) -> Option<PrefixCode> {
        self.codes[byte as usize]
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, PrefixCode)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(byte, code)| code.map(|code| (byte as u8, code)))
    }

    pub fn max_len(&self) -> u8 {
        self.iter().map(|(_, code)| code.len).max().unwrap_or(0)
    }

    /// Payload size in bits for an input with the given frequencies.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u128 {
        frequencies
            .iter_nonzero()
            .map(|(byte, count)| {
                let len = self.get(byte).map_or(0, |code| code.len);
                u128::from(count) * u128::from(len)
            })
            .sum()
    }

    /// No code is a prefix of a different symbol's code.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<_> = self.iter().collect();
        codes.iter().all(|(a, code_a)| {
            codes
                .iter()
                .all(|(b, code_b)| a == b || !code_a.is_prefix_of(code_b))
        })
    }
}
