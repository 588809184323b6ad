//! End-to-end behaviour of the codec on concrete inputs.

use std::io::Cursor;

use huffstream::{
    compress, decompress, CodecConfig, CompressedData, FormatError, HuffmanCodec, HuffmanError,
    HuffmanTree,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bytes drawn with probability proportional to 1 / (rank + 1).
fn zipf_bytes(len: usize, seed: u64) -> Vec<u8> {
    let weights: Vec<f64> = (0..256).map(|rank| 1.0 / (rank as f64 + 1.0)).collect();
    let total: f64 = weights.iter().sum();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let mut target = rng.gen::<f64>() * total;
            for (byte, weight) in weights.iter().enumerate() {
                if target < *weight {
                    return byte as u8;
                }
                target -= weight;
            }
            255
        })
        .collect()
}

#[test]
fn empty_input() {
    let compressed = compress(b"").unwrap();
    let parsed = CompressedData::parse(&compressed).unwrap();
    assert_eq!(parsed.original_length, 0);
    assert!(parsed.payload.is_empty());
    assert_eq!(decompress(&compressed).unwrap(), b"");
}

#[test]
fn single_distinct_byte() {
    let compressed = compress(b"aaaa").unwrap();
    assert_eq!(decompress(&compressed).unwrap(), b"aaaa");

    let long = vec![0u8; 100_000];
    let compressed = compress(&long).unwrap();
    // one bit per byte plus the header
    assert!(compressed.len() < 8 + 256 + 3 + 100_000 / 8 + 1);
    assert_eq!(decompress(&compressed).unwrap(), long);
}

#[test]
fn abracadabra() {
    let data = b"abracadabra";
    let compressed = compress(data).unwrap();
    let parsed = CompressedData::parse(&compressed).unwrap();

    let table = HuffmanTree::from_frequencies(&parsed.frequencies)
        .unwrap()
        .generate_table()
        .unwrap();
    let expected_bits: u64 = data
        .iter()
        .map(|&b| u64::from(table.get(b).unwrap().len))
        .sum();
    assert_eq!(parsed.payload.len() as u64, expected_bits.div_ceil(8));
    assert_eq!(parsed.payload_bits().unwrap(), u128::from(expected_bits));
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn skewed_input_shrinks() {
    let data = zipf_bytes(100_000, 7);
    let compressed = compress(&data).unwrap();
    assert!(
        compressed.len() < data.len(),
        "{} >= {}",
        compressed.len(),
        data.len()
    );
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn ninety_percent_one_value_shrinks() {
    let mut rng = StdRng::seed_from_u64(3);
    let data: Vec<u8> = (0..20_000)
        .map(|_| if rng.gen_bool(0.9) { b'x' } else { rng.gen() })
        .collect();
    let compressed = compress(&data).unwrap();
    assert!(compressed.len() < data.len() / 2);
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn every_byte_value() {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
}

#[test]
fn frequency_table_sums_to_length() {
    let data = zipf_bytes(5_000, 11);
    let parsed = CompressedData::parse(&compress(&data).unwrap()).unwrap();
    assert_eq!(parsed.original_length, data.len() as u64);
    assert_eq!(parsed.frequencies.total(), data.len() as u64);
}

#[test]
fn corrupted_payload_never_panics() {
    let data = zipf_bytes(2_000, 5);
    let compressed = compress(&data).unwrap();
    let header_len = compressed.len() - CompressedData::parse(&compressed).unwrap().payload.len();

    for offset in [header_len, header_len + 17, compressed.len() / 2, compressed.len() - 1] {
        let mut damaged = compressed.clone();
        damaged[offset] ^= 0x01;
        match decompress(&damaged) {
            Ok(output) => {
                assert_eq!(output.len(), data.len());
                assert_ne!(output, data, "flip at {offset} went unnoticed");
            }
            Err(HuffmanError::Format(FormatError::TruncatedPayload { .. })) => {}
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}

#[test]
fn corrupted_header_is_a_format_error() {
    let mut compressed = compress(b"hello world").unwrap();
    compressed[8 + b'h' as usize] = 2;
    let err = decompress(&compressed).unwrap_err();
    assert!(matches!(
        err,
        HuffmanError::Format(FormatError::FrequencyMismatch { .. })
    ));
}

#[test]
fn containers_can_be_concatenated() {
    let codec = HuffmanCodec::new(CodecConfig::default().with_read_buffer_size(64)).unwrap();
    let mut stream = Vec::new();
    codec.encode(Cursor::new(b"first"), &mut stream).unwrap();
    codec.encode(Cursor::new(b"second"), &mut stream).unwrap();
    let data = zipf_bytes(3_000, 13);
    codec.encode(Cursor::new(&data), &mut stream).unwrap();

    let mut source = Cursor::new(stream);
    let mut decoded = Vec::new();
    for _ in 0..3 {
        let mut out = Vec::new();
        codec.decode(&mut source, &mut out).unwrap();
        decoded.push(out);
    }
    assert_eq!(decoded[0], b"first");
    assert_eq!(decoded[1], b"second");
    assert_eq!(decoded[2], data);
    assert_eq!(source.position(), source.get_ref().len() as u64);

    let mut out = Vec::new();
    let err = codec.decode(&mut source, &mut out).unwrap_err();
    assert!(matches!(
        err,
        HuffmanError::Format(FormatError::TruncatedHeader(_))
    ));
}
