// src/coding/freq.rs

//! Symbol occurrence counting.

use std::io::Read;

use crate::bits::BitReader;
use crate::utils::error::Result;
use crate::{ALPHABET_SIZE, BITS_PER_SYMBOL, SENTINEL, SYMBOL_COUNT};

/// Per-symbol occurrence counts for one source stream.
///
/// Slot `s` holds the number of times symbol `s` occurred; the final slot
/// belongs to the end-of-stream sentinel and is always 1, so every tree
/// built from these weights has a code for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Counts symbol occurrences in `source` until it is exhausted.
    pub fn scan<R: Read>(source: R) -> Result<Self> {
        let mut counts = [0u64; SYMBOL_COUNT];
        let mut bits = BitReader::new(source);
        while let Some(symbol) = bits.read_bits(BITS_PER_SYMBOL)? {
            counts[symbol as usize] += 1;
        }
        counts[SENTINEL as usize] = 1;
        Ok(Self { counts })
    }

    /// Rebuilds a table from a transmitted vector of data-symbol counts.
    /// The sentinel slot is forced to 1, exactly as [`scan`](Self::scan)
    /// does, so both sides construct identical trees.
    pub fn from_counts(data_counts: &[u64; ALPHABET_SIZE]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        counts[..ALPHABET_SIZE].copy_from_slice(data_counts);
        counts[SENTINEL as usize] = 1;
        Self { counts }
    }

    /// The full weight vector, sentinel slot included.
    pub fn weights(&self) -> &[u64; SYMBOL_COUNT] {
        &self.counts
    }

    /// Occurrence count for one symbol.
    pub fn count(&self, symbol: u16) -> u64 {
        self.counts[symbol as usize]
    }

    /// Data symbols with a non-zero count, in ascending symbol order. The
    /// sentinel is not included.
    pub fn symbols(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts[..ALPHABET_SIZE]
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// Size of the uncompressed source in bits.
    pub fn original_bits(&self) -> u64 {
        self.symbols()
            .map(|(_, count)| count * BITS_PER_SYMBOL as u64)
            .sum()
    }
}
