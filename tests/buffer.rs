use trg_http::ResponseBuffer;

#[test]
fn buffer_accumulates_chunks_in_arrival_order() {
    let chunks: [&[u8]; 5] = [b"", b"hello", b" rp", b"", b"c-response"];
    let mut buffer = ResponseBuffer::new();

    for chunk in chunks {
        assert_eq!(buffer.write(chunk), chunk.len());
    }

    assert_eq!(buffer.len(), 18);
    assert_eq!(buffer.as_bytes(), b"hello rpc-response");
    assert_eq!(buffer.into_bytes(), chunks.concat());
}

#[test]
fn buffer_without_chunks_is_empty() {
    let buffer = ResponseBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.into_bytes(), Vec::<u8>::new());
}

#[test]
fn zero_length_chunks_still_reserve_the_sentinel_slot() {
    let mut buffer = ResponseBuffer::new();
    assert_eq!(buffer.write(b""), 0);
    assert_eq!(buffer.len(), 0);
    assert!(buffer.capacity() >= 1);
}
