#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use pagewise::{ChunkConfig, Chunker};

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (size, data) = input;
    let Ok(config) = ChunkConfig::new(size as usize) else {
        return;
    };
    let chunker = Chunker::new(config).unwrap();

    let streamed: Vec<_> = chunker
        .chunk_reader(Cursor::new(&data))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    // Verify: reader chunking agrees with in-memory chunking
    let in_memory = chunker.chunk_bytes(data.clone());
    assert_eq!(streamed, in_memory);

    // Verify: total bytes match input
    let total_bytes: usize = streamed.iter().map(|c| c.len()).sum();
    assert_eq!(total_bytes, data.len());
});
