#![no_main]

use libfuzzer_sys::fuzz_target;
use pagewise::chunk_list;

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (size, data) = input;
    let size = size as usize;

    if size == 0 {
        assert!(chunk_list(&data, size).is_err());
        return;
    }

    let chunks: Vec<_> = chunk_list(&data, size).unwrap().collect();

    // Verify: chunk count
    assert_eq!(chunks.len(), data.len().div_ceil(size));

    // Verify: every chunk but the last is full, the last is non-empty
    for (i, chunk) in chunks.iter().enumerate() {
        if i + 1 < chunks.len() {
            assert_eq!(chunk.len(), size);
        } else {
            assert!(!chunk.is_empty() && chunk.len() <= size);
        }
    }

    // Verify: offsets and indices are consistent
    let mut expected_offset = 0usize;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index(), i);
        assert_eq!(chunk.offset(), expected_offset);
        expected_offset += chunk.len();
    }

    // Verify: concatenation reproduces input
    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
    assert_eq!(joined, data);

    // Verify: determinism - a second pass yields the same chunks
    let again: Vec<_> = chunk_list(&data, size).unwrap().collect();
    assert_eq!(chunks, again);
});
