// src/codec/mod.rs

//! The codec orchestrator: measure-then-commit encoding and the mirrored
//! decode.
//!
//! Encoding is a two-phase protocol. [`EncodeSession::measure`] scans the
//! source, builds the code tree, and computes the exact compressed size
//! without writing a bit; [`EncodeSession::commit`] then writes the header
//! and payload from that state. [`decode`] reads the header, rebuilds or
//! deserializes the tree, and walks the payload back into symbols.

use std::collections::HashMap;
use std::io::{Read, Write};

use log::{debug, warn};

use crate::bits::{BitReader, BitWriter};
use crate::coding::freq::FrequencyTable;
use crate::coding::tree::{Code, CodeTree};
use crate::utils::error::{Error, FormatError, Result};
use crate::utils::report::{LogSink, StatusSink};
use crate::{ALPHABET_SIZE, BITS_PER_SYMBOL, SENTINEL};

/// First 32 bits of every compressed stream.
pub const MAGIC: u32 = 0xFACE_8200;

/// Wire width of the magic, the header-style tag, a transmitted count, and
/// the tree shape length.
const HEADER_FIELD_BITS: u32 = 32;

/// How the header transmits the information needed to rebuild the code
/// tree on the decode side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// The full weight vector, one 32-bit count per data symbol; the
    /// decoder rebuilds the tree with the same deterministic construction
    /// the encoder used.
    Counts,
    /// The serialized tree shape, prefixed by its bit length; the decoder
    /// deserializes it directly.
    Tree,
}

impl HeaderStyle {
    fn tag(self) -> u32 {
        match self {
            HeaderStyle::Counts => 1,
            HeaderStyle::Tree => 2,
        }
    }

    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(HeaderStyle::Counts),
            2 => Some(HeaderStyle::Tree),
            _ => None,
        }
    }
}

/// Encode state carried from the measure phase to the commit phase.
///
/// [`measure`](Self::measure) scans the source once and derives everything
/// commit needs (weight vector, tree, code mapping, exact bit cost)
/// without writing anything. [`commit`](Self::commit) writes the stream
/// from this state; committing without measuring first is unrepresentable.
pub struct EncodeSession {
    style: HeaderStyle,
    frequencies: FrequencyTable,
    tree: CodeTree,
    codes: HashMap<u16, Code>,
    original_bits: u64,
    compressed_bits: u64,
}

impl EncodeSession {
    /// Phase 1: derive the code and compute the exact compressed size for
    /// the requested header style.
    pub fn measure<R: Read>(source: R, style: HeaderStyle) -> Result<Self> {
        let frequencies = FrequencyTable::scan(source)?;
        let tree = CodeTree::from_weights(frequencies.weights())?;
        let codes = tree.codes();

        let payload_bits: u64 = frequencies
            .symbols()
            .map(|(symbol, count)| count * codes[&symbol].len() as u64)
            .sum();
        let sentinel_bits = codes[&SENTINEL].len() as u64;
        let header_bits = match style {
            HeaderStyle::Counts => ALPHABET_SIZE as u64 * HEADER_FIELD_BITS as u64,
            HeaderStyle::Tree => HEADER_FIELD_BITS as u64 + tree.shape_bits(),
        };
        let original_bits = frequencies.original_bits();
        let compressed_bits =
            2 * HEADER_FIELD_BITS as u64 + header_bits + payload_bits + sentinel_bits;

        debug!(
            "measured {original_bits} source bits -> {compressed_bits} compressed bits ({style:?} header)"
        );

        Ok(Self {
            style,
            frequencies,
            tree,
            codes,
            original_bits,
            compressed_bits,
        })
    }

    /// Signed difference `original_bits - compressed_bits`. Negative means
    /// committing would grow the stream.
    pub fn savings(&self) -> i64 {
        self.original_bits as i64 - self.compressed_bits as i64
    }

    /// Header style this session measured for.
    pub fn style(&self) -> HeaderStyle {
        self.style
    }

    /// Size of the uncompressed source, in bits.
    pub fn original_bits(&self) -> u64 {
        self.original_bits
    }

    /// Exact size of the stream a commit will write, in bits.
    pub fn compressed_bits(&self) -> u64 {
        self.compressed_bits
    }

    /// Phase 2: write the compressed stream: magic, header-style tag,
    /// header payload, each source symbol's code, then the sentinel's code.
    ///
    /// `source` must be the same symbol stream measured in phase 1.
    /// Refuses with [`Error::ExpansionRefused`] when the measured savings
    /// are negative and `allow_expansion` is not set.
    ///
    /// Returns the number of bits written, flush padding excluded; this
    /// always equals [`compressed_bits`](Self::compressed_bits).
    pub fn commit<R: Read, W: Write>(
        &self,
        source: R,
        sink: W,
        allow_expansion: bool,
    ) -> Result<u64> {
        if self.savings() < 0 && !allow_expansion {
            let overshoot = self.compressed_bits - self.original_bits;
            warn!("refusing to commit: output would grow by {overshoot} bits");
            return Err(Error::ExpansionRefused { overshoot });
        }

        let mut out = BitWriter::new(sink);
        out.write_bits(MAGIC as u64, HEADER_FIELD_BITS)?;
        out.write_bits(self.style.tag() as u64, HEADER_FIELD_BITS)?;

        match self.style {
            HeaderStyle::Counts => {
                for slot in 0..ALPHABET_SIZE {
                    out.write_bits(self.frequencies.count(slot as u16), HEADER_FIELD_BITS)?;
                }
            }
            HeaderStyle::Tree => {
                out.write_bits(self.tree.shape_bits(), HEADER_FIELD_BITS)?;
                self.tree.write_shape(&mut out)?;
            }
        }

        let mut bits = BitReader::new(source);
        while let Some(symbol) = bits.read_bits(BITS_PER_SYMBOL)? {
            let code = self
                .codes
                .get(&(symbol as u16))
                .ok_or(Error::UnmeasuredSymbol(symbol as u16))?;
            out.write_code(code)?;
        }
        out.write_code(&self.codes[&SENTINEL])?;

        let written = out.bits_written();
        out.flush()?;
        debug!("committed {written} bits");
        Ok(written)
    }
}

/// Decodes a compressed stream, writing the recovered symbols to `sink`.
///
/// Returns the number of bits written. Decoded symbols stream to the sink
/// as they are produced, so a failure partway may leave partial output
/// behind; callers that need all-or-nothing output should decode into a
/// buffer first.
pub fn decode<R: Read, W: Write>(source: R, sink: W) -> Result<u64> {
    let mut bits = BitReader::new(source);

    let magic = bits
        .read_bits(HEADER_FIELD_BITS)?
        .ok_or(FormatError::HeaderTruncated)? as u32;
    if magic != MAGIC {
        return Err(FormatError::BadMagic(magic).into());
    }

    let tag = bits
        .read_bits(HEADER_FIELD_BITS)?
        .ok_or(FormatError::HeaderTruncated)? as u32;
    let style = HeaderStyle::from_tag(tag).ok_or(FormatError::UnknownHeaderStyle(tag))?;

    let tree = match style {
        HeaderStyle::Counts => {
            let mut counts = [0u64; ALPHABET_SIZE];
            for slot in counts.iter_mut() {
                *slot = bits
                    .read_bits(HEADER_FIELD_BITS)?
                    .ok_or(FormatError::HeaderTruncated)?;
            }
            let table = FrequencyTable::from_counts(&counts);
            CodeTree::from_weights(table.weights())?
        }
        HeaderStyle::Tree => {
            let declared = bits
                .read_bits(HEADER_FIELD_BITS)?
                .ok_or(FormatError::HeaderTruncated)?;
            let before = bits.bits_read();
            let tree = CodeTree::read_shape(&mut bits)?;
            let actual = bits.bits_read() - before;
            if actual != declared {
                return Err(FormatError::ShapeLength { declared, actual }.into());
            }
            tree
        }
    };

    let mut out = BitWriter::new(sink);
    let written = tree.walk(&mut bits, &mut out)?;
    out.flush()?;
    debug!("decoded {written} bits");
    Ok(written)
}

/// Thin policy wrapper over the measure/commit/decode core.
///
/// Runs the two encode phases back to back over an in-memory source and
/// narrates outcomes to a [`StatusSink`]; carries no codec state of its
/// own.
pub struct Compressor<S: StatusSink> {
    status: S,
}

impl Compressor<LogSink> {
    /// A compressor that reports through the `log` facade.
    pub fn new() -> Self {
        Self { status: LogSink }
    }
}

impl Default for Compressor<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StatusSink> Compressor<S> {
    /// A compressor that reports to the given sink.
    pub fn with_status(status: S) -> Self {
        Self { status }
    }

    /// Measures `data`, then commits it to `sink` if the savings allow.
    pub fn compress<W: Write>(
        &mut self,
        data: &[u8],
        sink: W,
        style: HeaderStyle,
        allow_expansion: bool,
    ) -> Result<u64> {
        let session = EncodeSession::measure(data, style)?;
        match session.commit(data, sink, allow_expansion) {
            Ok(written) => {
                self.status.report(&format!(
                    "compressed {} bits into {written} ({} bits saved)",
                    session.original_bits(),
                    session.savings(),
                ));
                Ok(written)
            }
            Err(Error::ExpansionRefused { overshoot }) => {
                self.status.report(&format!(
                    "compressed output would be {overshoot} bits larger; \
                     pass allow_expansion to write it anyway"
                ));
                Err(Error::ExpansionRefused { overshoot })
            }
            Err(err) => Err(err),
        }
    }

    /// Decodes `source` into `sink`, reporting failures.
    pub fn expand<R: Read, W: Write>(&mut self, source: R, sink: W) -> Result<u64> {
        decode(source, sink).inspect_err(|err| {
            self.status.report(&format!("decode failed: {err}"));
        })
    }
}
