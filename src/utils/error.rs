// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all operations in the codec library.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred on the underlying byte reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Extraction from an empty priority queue. The sentinel slot keeps the
    /// weight vector non-empty, so reaching this is an invariant violation.
    #[error("extract from an empty priority queue")]
    EmptyQueue,

    /// The compressed stream failed a format check; see [`FormatError`].
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The bit source ran out during the decode walk, before the
    /// end-of-stream code. The stream was cut off rather than corrupted.
    #[error("compressed stream ended before the end-of-stream code")]
    TruncatedStream,

    /// Committing would grow the stream and the caller did not opt in.
    #[error("compressed output would grow by {overshoot} bits; pass allow_expansion to force")]
    ExpansionRefused { overshoot: u64 },

    /// Commit was fed a source containing a symbol the measure phase never
    /// saw. The same stream must be supplied to both phases.
    #[error("symbol {0} has no code in the measured table")]
    UnmeasuredSymbol(u16),
}

/// Fatal decode aborts: the input is not a valid compressed stream.
///
/// Each variant names the check that failed, so a front end can render a
/// precise message. None of these are recoverable locally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The stream did not start with [`MAGIC`](crate::MAGIC).
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),

    /// The header-style tag was neither counts (1) nor tree (2).
    #[error("unknown header style tag {0}")]
    UnknownHeaderStyle(u32),

    /// The stream ended inside a fixed-width header field.
    #[error("stream ended inside the header")]
    HeaderTruncated,

    /// The stream ended inside the serialized tree shape.
    #[error("stream ended inside the serialized tree shape")]
    ShapeTruncated,

    /// A leaf in the serialized shape carried a symbol above the sentinel.
    #[error("tree shape leaf carries out-of-range symbol {0}")]
    ShapeSymbolRange(u16),

    /// A single-leaf shape whose leaf is not the end-of-stream symbol; the
    /// serializer cannot produce it and the decode walk could never
    /// terminate on it.
    #[error("single-leaf tree shape without the end-of-stream symbol")]
    ShapeMissingSentinel,

    /// The serialized shape did not occupy exactly the declared bit count.
    #[error("tree shape used {actual} bits, header declared {declared}")]
    ShapeLength { declared: u64, actual: u64 },
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
