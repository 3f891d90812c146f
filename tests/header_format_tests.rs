//! Byte-level checks of the compressed stream header.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use huff_codec::{ALPHABET_SIZE, EncodeSession, HeaderStyle, MAGIC, SHAPE_SYMBOL_BITS};

fn compress(data: &[u8], style: HeaderStyle) -> Vec<u8> {
    let session = EncodeSession::measure(data, style).expect("measure failed");
    let mut compressed = Vec::new();
    session
        .commit(data, &mut compressed, true)
        .expect("commit failed");
    compressed
}

#[test]
fn test_counts_header_layout() {
    let compressed = compress(b"aab", HeaderStyle::Counts);
    let mut cursor = Cursor::new(&compressed);

    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), MAGIC);
    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 1);

    let mut counts = [0u32; ALPHABET_SIZE];
    for slot in counts.iter_mut() {
        *slot = cursor.read_u32::<BigEndian>().unwrap();
    }
    assert_eq!(counts[b'a' as usize], 2);
    assert_eq!(counts[b'b' as usize], 1);
    assert_eq!(counts.iter().map(|&c| c as u64).sum::<u64>(), 3);
}

#[test]
fn test_tree_header_declares_shape_length() {
    // Three leaves (a, b, sentinel): 3 * (1 + symbol width) + 2 bits.
    let compressed = compress(b"aab", HeaderStyle::Tree);
    let mut cursor = Cursor::new(&compressed);

    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), MAGIC);
    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 2);

    let declared = cursor.read_u32::<BigEndian>().unwrap();
    assert_eq!(declared, 3 * (1 + SHAPE_SYMBOL_BITS) + 2);
}

#[test]
fn test_magic_bytes_on_the_wire() {
    let compressed = compress(b"anything", HeaderStyle::Tree);
    assert_eq!(&compressed[..4], &[0xFA, 0xCE, 0x82, 0x00]);
}

#[test]
fn test_measured_cost_includes_whole_header() {
    let data = b"measure twice, commit once";
    let counts = EncodeSession::measure(data.as_slice(), HeaderStyle::Counts).unwrap();
    let tree = EncodeSession::measure(data.as_slice(), HeaderStyle::Tree).unwrap();

    // Same payload either way; only the header sizes differ.
    let counts_header = 64 + 32 * ALPHABET_SIZE as u64;
    let payload = counts.compressed_bits() - counts_header;
    assert_eq!(
        tree.compressed_bits(),
        64 + 32 + tree_shape_bits(data) + payload
    );
}

fn tree_shape_bits(data: &[u8]) -> u64 {
    use huff_codec::{CodeTree, FrequencyTable};
    let table = FrequencyTable::scan(data).unwrap();
    CodeTree::from_weights(table.weights()).unwrap().shape_bits()
}
