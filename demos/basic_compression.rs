use huffstream::HuffmanCodec;
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a sample file
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes. "
        .repeat(40);

    std::fs::write("sample.txt", &sample_text)?;

    println!("Created sample file: {} bytes", sample_text.len());

    let codec = HuffmanCodec::default();

    // Compress the file
    let input = File::open("sample.txt")?;
    let output = BufWriter::new(File::create("sample.huff")?);
    let stats = codec.encode_with_stats(input, output)?;

    println!(
        "Compressed to: {} bytes ({:.1}% of original, {} byte header)",
        stats.compressed_len,
        stats.ratio() * 100.0,
        stats.header_len
    );

    // Decompress the file
    let compressed = BufReader::new(File::open("sample.huff")?);
    let decompressed = BufWriter::new(File::create("decompressed.txt")?);
    codec.decode(compressed, decompressed)?;

    // Verify the result
    let decompressed_text = std::fs::read_to_string("decompressed.txt")?;

    if sample_text == decompressed_text {
        println!("Decompression successful, data matches exactly.");
    } else {
        println!("Decompression failed, data mismatch.");
        return Err("Decompression verification failed".into());
    }

    // Cleanup
    std::fs::remove_file("sample.txt")?;
    std::fs::remove_file("sample.huff")?;
    std::fs::remove_file("decompressed.txt")?;

    println!("Cleaned up temporary files");

    Ok(())
}
