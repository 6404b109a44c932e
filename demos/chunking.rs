//! Fixed-size chunking of a list.
//!
//! Run with:
//!     cargo run --example chunking

use pagewise::{ChunkConfig, Chunker, chunk_list};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u32> = (0..10).collect(); // [0,1,2,3,4,5,6,7,8,9]

    for chunk in chunk_list(&data, 3)? {
        println!("{:?}", chunk.as_slice());
    }

    // Same thing over a byte stream
    let text = b"the quick brown fox jumps over the lazy dog";
    let chunker = Chunker::new(ChunkConfig::new(8)?)?;

    println!("\nChunking {} bytes of text...\n", text.len());
    for chunk in chunker.chunk_reader(&text[..]) {
        let chunk = chunk?;
        println!(
            "offset={:>3}, len={}, {:?}",
            chunk.offset,
            chunk.len(),
            String::from_utf8_lossy(&chunk.data)
        );
    }

    // A zero chunk size is rejected up front
    if let Err(e) = chunk_list(&data, 0) {
        println!("\nError: {}", e);
    }

    Ok(())
}
