//! Bump allocator for tree nodes.
//!
//! All nodes of one tree live in a single pre-sized block and are addressed
//! by [`NodeId`]. Nothing is freed until the arena itself is dropped.

use crate::error::{HuffmanError, Result};

/// Index of a node inside its [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
        /// Placeholder sibling that gives a lone symbol a one-bit code.
        synthetic: bool,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn leaf(byte: u8, weight: u64) -> Self {
        HuffNode::Leaf {
            weight,
            byte,
            synthetic: false,
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<HuffNode>,
    capacity: usize,
}

impl NodeArena {
    /// Reserves room for `capacity` nodes up front.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(capacity)
            .map_err(|_| HuffmanError::allocation(capacity))?;
        Ok(NodeArena { nodes, capacity })
    }

    /// Places `node` in the next free slot.
    pub fn alloc(&mut self, node: HuffNode) -> Result<NodeId> {
        if self.nodes.len() >= self.capacity {
            return Err(HuffmanError::allocation(self.capacity + 1));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
