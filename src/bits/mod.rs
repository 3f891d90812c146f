// src/bits/mod.rs

//! Bit-granularity I/O over `std::io` streams.
//!
//! Everything on the wire is MSB-first: `write_bits(0b101, 3)` emits the
//! bits 1, 0, 1 in that order, and [`BitWriter::flush`] pads the final
//! partial byte with zeros. Both halves keep a running bit tally so the
//! orchestrator can verify measured sizes against what actually moved.

use std::io::{self, Read, Write};

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use crate::utils::error::Result;

/// A bit-level writer over any byte sink.
pub struct BitWriter<W: Write> {
    writer: W,
    current: u8,
    filled: u8,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Creates a new BitWriter.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            current: 0,
            filled: 0,
            written: 0,
        }
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.written += 1;

        if self.filled == 8 {
            self.writer.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Writes the lowest `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u32) -> Result<()> {
        debug_assert!(count <= 64);
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Writes a variable-length code verbatim.
    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in code {
            self.write_bit(*bit)?;
        }
        Ok(())
    }

    /// Number of bits written so far, flush padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Pads the final partial byte with zeros and flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        if self.filled > 0 {
            self.writer.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A bit-level reader over any byte source.
///
/// End of input is a value, not an error: reads return `Ok(None)` once the
/// source is exhausted. A multi-bit read that hits the end partway reports
/// exhaustion the same way; the bits already consumed are discarded, since
/// a stream that ends inside a value can only be abandoned.
pub struct BitReader<R: Read> {
    reader: R,
    current: u8,
    remaining: u8,
    consumed: u64,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current: 0,
            remaining: 0,
            consumed: 0,
        }
    }

    fn refill(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.current = byte[0];
                    self.remaining = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads a single bit; `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.remaining == 0 && !self.refill()? {
            return Ok(None);
        }
        self.remaining -= 1;
        self.consumed += 1;
        Ok(Some((self.current >> self.remaining) & 1 == 1))
    }

    /// Reads `count` bits MSB-first; `None` if the source cannot supply them.
    pub fn read_bits(&mut self, count: u32) -> Result<Option<u64>> {
        debug_assert!(count <= 64);
        let mut value = 0u64;
        for _ in 0..count {
            match self.read_bit()? {
                Some(bit) => value = value << 1 | bit as u64,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_single_byte() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(0b1011_0011, 8).unwrap();
        writer.flush().unwrap();
        assert_eq!(out, vec![0b1011_0011]);

        let mut reader = BitReader::new(out.as_slice());
        assert_eq!(reader.read_bits(8).unwrap(), Some(0b1011_0011));
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_partial_bits_are_padded() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        assert_eq!(writer.bits_written(), 5);
        writer.flush().unwrap();
        // 10111 padded to 10111000
        assert_eq!(out, vec![0b1011_1000]);

        let mut reader = BitReader::new(out.as_slice());
        assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
        assert_eq!(reader.read_bits(2).unwrap(), Some(0b11));
        assert_eq!(reader.bits_read(), 5);
    }

    #[test]
    fn test_multi_byte_value() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(0xFACE_8200, 32).unwrap();
        writer.flush().unwrap();
        assert_eq!(out, vec![0xFA, 0xCE, 0x82, 0x00]);

        let mut reader = BitReader::new(out.as_slice());
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xFACE_8200));
    }

    #[test]
    fn test_exhaustion_mid_value() {
        let data = [0xFFu8];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(reader.read_bits(5).unwrap(), Some(0b11111));
        // only 3 bits left
        assert_eq!(reader.read_bits(4).unwrap(), None);
    }

    #[test]
    fn test_write_code_roundtrip() {
        use bitvec::prelude::*;

        let code = bitvec![u8, Msb0; 1, 0, 1, 1];
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_code(&code).unwrap();
        assert_eq!(writer.bits_written(), 4);
        writer.flush().unwrap();
        assert_eq!(out, vec![0b1011_0000]);
    }

    #[test]
    fn test_bit_by_bit() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for &bit in &[true, false, true, true, false, false, true, false] {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(out, vec![0b1011_0010]);

        let mut reader = BitReader::new(out.as_slice());
        for &expected in &[true, false, true, true, false, false, true, false] {
            assert_eq!(reader.read_bit().unwrap(), Some(expected));
        }
        assert_eq!(reader.read_bit().unwrap(), None);
    }
}
