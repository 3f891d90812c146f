//! A lossless stream compressor built on Huffman coding over bytes.
//!
//! The codec derives an optimal prefix code from symbol frequencies,
//! writes a self-describing header (either the raw counts or the
//! serialized tree shape) followed by the coded payload, and reverses
//! the process exactly. An out-of-band end-of-stream symbol terminates
//! the payload, so no length field is needed, and tree construction is
//! deterministic: the decoder rebuilds the identical tree from counts
//! alone.
//!
//! # Quick Start
//!
//! ```
//! use huff_codec::{decode, EncodeSession, HeaderStyle};
//!
//! let source = b"abracadabra".as_slice();
//!
//! // Phase 1: measure. Nothing is written yet.
//! let session = EncodeSession::measure(source, HeaderStyle::Tree)?;
//!
//! // Phase 2: commit. Short inputs expand (the header dominates), so
//! // opt in; commit refuses otherwise.
//! let mut compressed = Vec::new();
//! session.commit(source, &mut compressed, true)?;
//!
//! let mut recovered = Vec::new();
//! decode(compressed.as_slice(), &mut recovered)?;
//! assert_eq!(recovered, source);
//! # Ok::<(), huff_codec::Error>(())
//! ```

// Core modules
pub mod bits;
pub mod codec;
pub mod coding;
pub mod utils;

// Public codec API
pub use codec::{Compressor, EncodeSession, HeaderStyle, MAGIC, decode};

// Coding engine types (for custom workflows)
pub use coding::freq::FrequencyTable;
pub use coding::queue::FairQueue;
pub use coding::tree::{Code, CodeTree, Node};

// Error types
pub use utils::error::{Error, FormatError, Result};
pub use utils::report::{LogSink, StatusSink};

/// Fixed width of a data symbol, in bits.
pub const BITS_PER_SYMBOL: u32 = 8;

/// Number of distinct data symbols.
pub const ALPHABET_SIZE: usize = 256;

/// The end-of-stream sentinel: one past the last data symbol, never
/// present in real data, always given frequency 1.
pub const SENTINEL: u16 = ALPHABET_SIZE as u16;

/// Weight-vector length: every data symbol plus the sentinel.
pub const SYMBOL_COUNT: usize = ALPHABET_SIZE + 1;

/// Width of a leaf's symbol in the serialized tree shape; one bit wider
/// than a data symbol so the sentinel fits.
pub const SHAPE_SYMBOL_BITS: u32 = BITS_PER_SYMBOL + 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_constants_agree() {
        assert_eq!(SYMBOL_COUNT, ALPHABET_SIZE + 1);
        assert_eq!(SENTINEL as usize, ALPHABET_SIZE);
        assert_eq!(SHAPE_SYMBOL_BITS, BITS_PER_SYMBOL + 1);
        // the sentinel must fit in a shape leaf but not in a data symbol
        assert!((SENTINEL as u64) < (1 << SHAPE_SYMBOL_BITS));
        assert!((SENTINEL as u64) >= (1 << BITS_PER_SYMBOL));
    }

    #[test]
    fn test_public_api_roundtrip() {
        let data = b"so much depends upon a red wheel barrow";
        let session = EncodeSession::measure(data.as_slice(), HeaderStyle::Counts).unwrap();
        let mut compressed = Vec::new();
        session.commit(data.as_slice(), &mut compressed, true).unwrap();

        let mut recovered = Vec::new();
        decode(compressed.as_slice(), &mut recovered).unwrap();
        assert_eq!(recovered, data);
    }
}
