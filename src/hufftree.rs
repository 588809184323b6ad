use std::cmp::Ordering;

use crate::arena::{HuffNode, NodeArena, NodeId};
use crate::code_table::{CodeTable, PrefixCode};
use crate::error::{FormatError, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Node slots reserved when no capacity is configured.
pub const DEFAULT_ARENA_CAPACITY: usize = 512;

/// Prefix tree built from a [`FrequencyTable`].
///
/// Building twice from the same table gives the same tree, which is what
/// lets the decoder rebuild the encoder's codes from the stored counts.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    arena: NodeArena,
    root: Option<NodeId>,
}

/// Heap entry ordered by weight alone.
#[derive(Debug, Clone, Copy)]
struct Weighted {
    weight: u64,
    id: NodeId,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight)
    }
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        Self::with_arena_capacity(frequencies, DEFAULT_ARENA_CAPACITY)
    }

    pub fn with_arena_capacity(frequencies: &FrequencyTable, capacity: usize) -> Result<Self> {
        let mut arena = NodeArena::with_capacity(capacity)?;

        let mut symbols = frequencies.iter_nonzero();
        let root = match (symbols.next(), symbols.next()) {
            (None, _) => None,
            (Some((byte, weight)), None) => Some(Self::pad_single(&mut arena, byte, weight)?),
            _ => Self::merge_all(&mut arena, frequencies)?,
        };

        log::trace!(
            "built huffman tree: {} symbols, {} nodes",
            frequencies.distinct(),
            arena.len()
        );
        Ok(HuffmanTree { arena, root })
    }

    /// A lone leaf has no path, so it gets a placeholder sibling that no
    /// valid payload ever selects.
    fn pad_single(arena: &mut NodeArena, byte: u8, weight: u64) -> Result<NodeId> {
        let only = arena.alloc(HuffNode::leaf(byte, weight))?;
        let sibling = arena.alloc(HuffNode::Leaf {
            weight: 0,
            byte: byte.wrapping_add(1),
            synthetic: true,
        })?;
        arena.alloc(HuffNode::Internal {
            weight,
            left: only,
            right: sibling,
        })
    }

    fn merge_all(arena: &mut NodeArena, frequencies: &FrequencyTable) -> Result<Option<NodeId>> {
        let mut heap = MinHeap::with_capacity(frequencies.distinct());
        for (byte, count) in frequencies.iter_nonzero() {
            let id = arena.alloc(HuffNode::leaf(byte, count))?;
            heap.insert(Weighted { weight: count, id });
        }

        while heap.heap_size() > 1 {
            let (Ok(left), Ok(right)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            let weight = left
                .weight
                .checked_add(right.weight)
                .ok_or(FormatError::FrequencyOverflow)?;
            let id = arena.alloc(HuffNode::Internal {
                weight,
                left: left.id,
                right: right.id,
            })?;
            heap.insert(Weighted { weight, id });
        }
        Ok(heap.peek().map(|root| root.id))
    }

    /// `None` for a tree built from an empty table.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        self.arena.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Child of `id` selected by `bit`. Leaves map to themselves.
    pub fn step(&self, id: NodeId, bit: bool) -> NodeId {
        match self.arena.get(id) {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    *left
                }
            }
            HuffNode::Leaf { .. } => id,
        }
    }

    /// Assigns every real leaf its root-to-leaf path.
    pub fn generate_table(&self) -> Result<CodeTable> {
        let mut table = CodeTable::default();
        let Some(root) = self.root else {
            return Ok(table);
        };

        let mut stack = vec![(root, PrefixCode::EMPTY)];
        while let Some((id, path)) = stack.pop() {
            match self.arena.get(id) {
                HuffNode::Leaf {
                    synthetic: true, ..
                } => {}
                HuffNode::Leaf { byte, .. } => table.insert(*byte, path),
                HuffNode::Internal { left, right, .. } => {
                    let too_long = || HuffmanError::CodeTooLong {
                        byte: self.first_leaf_byte(*left),
                    };
                    stack.push((*right, path.descend(true).ok_or_else(too_long)?));
                    stack.push((*left, path.descend(false).ok_or_else(too_long)?));
                }
            }
        }
        Ok(table)
    }

    /// Payload size in bits: every leaf's depth times its weight. Unlike
    /// [`Self::generate_table`] this has no code length limit.
    pub fn payload_bits(&self) -> u128 {
        let Some(root) = self.root else {
            return 0;
        };
        let mut bits = 0u128;
        let mut stack = vec![(root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            match self.arena.get(id) {
                HuffNode::Leaf { weight, .. } => bits += u128::from(*weight) * u128::from(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        bits
    }

    fn first_leaf_byte(&self, mut id: NodeId) -> u8 {
        loop {
            match self.arena.get(id) {
                HuffNode::Leaf { byte, .. } => return *byte,
                HuffNode::Internal { left, .. } => id = *left,
            }
        }
    }
}
