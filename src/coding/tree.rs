// src/coding/tree.rs

//! The Huffman code tree: construction from weights, code derivation,
//! bit-level shape serialization, and the decode walk.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Write};

use bitvec::order::Msb0;
use bitvec::vec::BitVec;

use crate::bits::{BitReader, BitWriter};
use crate::coding::queue::FairQueue;
use crate::utils::error::{Error, FormatError, Result};
use crate::{BITS_PER_SYMBOL, SENTINEL, SHAPE_SYMBOL_BITS};

/// A variable-length prefix code for one symbol, first bit first.
pub type Code = BitVec<u8, Msb0>;

/// Node of the code tree.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf {
        symbol: u16,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }
}

// Construction order compares weight alone; equal weights keep their
// insertion order inside the queue.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.weight() == other.weight()
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}

/// An immutable Huffman code tree.
#[derive(Debug, Clone)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Builds the tree from a weight vector: one leaf per positive slot,
    /// then the two minimum nodes are merged until one remains.
    ///
    /// Leaves are inserted in ascending slot order, which pins the
    /// tie-break: rebuilding from the same weights always yields the same
    /// tree, bit for bit. The decoder relies on this when only counts are
    /// transmitted. Fails with [`Error::EmptyQueue`] when no slot is
    /// positive.
    pub fn from_weights(weights: &[u64]) -> Result<Self> {
        let mut queue = FairQueue::new();
        for (slot, &weight) in weights.iter().enumerate() {
            if weight > 0 {
                queue.insert(Node::Leaf {
                    symbol: slot as u16,
                    weight,
                });
            }
        }

        while queue.len() > 1 {
            let a = queue.extract_min()?;
            let b = queue.extract_min()?;
            queue.insert(Node::Internal {
                weight: a.weight() + b.weight(),
                left: Box::new(a),
                right: Box::new(b),
            });
        }

        Ok(Self {
            root: queue.extract_min()?,
        })
    }

    /// Derives the symbol → code mapping by depth-first traversal: 0 for a
    /// left descent, 1 for a right descent, one entry per leaf.
    pub fn codes(&self) -> HashMap<u16, Code> {
        let mut map = HashMap::new();
        let mut prefix = Code::new();
        collect_codes(&self.root, &mut prefix, &mut map);
        map
    }

    /// Bit length of the serialized shape.
    pub fn shape_bits(&self) -> u64 {
        shape_bits(&self.root)
    }

    /// Serializes the shape pre-order: a leaf is bit `1` followed by its
    /// symbol in [`SHAPE_SYMBOL_BITS`] bits, an internal node is bit `0`
    /// followed by its left then right subtree.
    pub fn write_shape<W: Write>(&self, out: &mut BitWriter<W>) -> Result<()> {
        write_shape(&self.root, out)
    }

    /// Reconstructs a tree from its serialized shape.
    ///
    /// Weights are not on the wire; reconstructed nodes carry weight 0.
    /// Malformed shapes fail with a [`FormatError`] naming the check.
    pub fn read_shape<R: Read>(input: &mut BitReader<R>) -> Result<Self> {
        let root = read_shape(input)?;
        if let Node::Leaf { symbol, .. } = root {
            if symbol != SENTINEL {
                return Err(FormatError::ShapeMissingSentinel.into());
            }
        }
        Ok(Self { root })
    }

    /// Decodes the payload: one bit per step from the root, 0 = left,
    /// 1 = right; a sentinel leaf terminates the walk, any other leaf is
    /// emitted as a [`BITS_PER_SYMBOL`]-bit value and the cursor resets to
    /// the root.
    ///
    /// Returns the number of bits written to `output`. Fails with
    /// [`Error::TruncatedStream`] if `input` runs out before the sentinel.
    pub fn walk<R: Read, W: Write>(
        &self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
    ) -> Result<u64> {
        if let Node::Leaf { symbol, .. } = &self.root {
            // A lone leaf can only be the end marker (zero-symbol stream).
            return if *symbol == SENTINEL {
                Ok(0)
            } else {
                Err(FormatError::ShapeMissingSentinel.into())
            };
        }

        let mut written = 0u64;
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { symbol, .. } => {
                    if *symbol == SENTINEL {
                        return Ok(written);
                    }
                    output.write_bits(*symbol as u64, BITS_PER_SYMBOL)?;
                    written += BITS_PER_SYMBOL as u64;
                    node = &self.root;
                }
                Node::Internal { left, right, .. } => {
                    let bit = input.read_bit()?.ok_or(Error::TruncatedStream)?;
                    node = if bit { right } else { left };
                }
            }
        }
    }
}

fn collect_codes(node: &Node, prefix: &mut Code, map: &mut HashMap<u16, Code>) {
    match node {
        Node::Leaf { symbol, .. } => {
            map.insert(*symbol, prefix.clone());
        }
        Node::Internal { left, right, .. } => {
            prefix.push(false);
            collect_codes(left, prefix, map);
            prefix.pop();
            prefix.push(true);
            collect_codes(right, prefix, map);
            prefix.pop();
        }
    }
}

fn shape_bits(node: &Node) -> u64 {
    match node {
        Node::Leaf { .. } => 1 + SHAPE_SYMBOL_BITS as u64,
        Node::Internal { left, right, .. } => 1 + shape_bits(left) + shape_bits(right),
    }
}

fn write_shape<W: Write>(node: &Node, out: &mut BitWriter<W>) -> Result<()> {
    match node {
        Node::Leaf { symbol, .. } => {
            out.write_bit(true)?;
            out.write_bits(*symbol as u64, SHAPE_SYMBOL_BITS)
        }
        Node::Internal { left, right, .. } => {
            out.write_bit(false)?;
            write_shape(left, out)?;
            write_shape(right, out)
        }
    }
}

fn read_shape<R: Read>(input: &mut BitReader<R>) -> Result<Node> {
    match input.read_bit()? {
        None => Err(FormatError::ShapeTruncated.into()),
        Some(true) => {
            let symbol = input
                .read_bits(SHAPE_SYMBOL_BITS)?
                .ok_or(FormatError::ShapeTruncated)? as u16;
            if symbol > SENTINEL {
                return Err(FormatError::ShapeSymbolRange(symbol).into());
            }
            Ok(Node::Leaf { symbol, weight: 0 })
        }
        Some(false) => {
            let left = read_shape(input)?;
            let right = read_shape(input)?;
            Ok(Node::Internal {
                weight: 0,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
    }
}
