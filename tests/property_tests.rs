//! Property-based tests for the segmented inflate cursor
//!
//! These tests use randomized payloads, transport chunk schedules and buffer
//! sizes to verify that decoding is independent of how bytes arrive.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use proptest::prelude::*;
use segflate::{ChunkedSource, CursorOptions, ErrorKind, InflateCursor};
use std::io::Write;

fn zlib_segments(payloads: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    let mut segments = Vec::new();
    let mut taken = 0;
    for payload in payloads {
        encoder.write_all(payload).unwrap();
        encoder.flush().unwrap();
        let written = encoder.get_ref();
        segments.push(written[taken..].to_vec());
        taken = written.len();
    }
    segments
}

proptest! {
    #[test]
    fn test_round_trip_any_chunking(
        data in prop::collection::vec(any::<u8>(), 0..5000),
        schedule in prop::collection::vec(1..64usize, 1..8),
        buffer_size in 1..2048usize,
    ) {
        let segments = zlib_segments(&[data.clone()]);
        let options = CursorOptions::default().with_buffer_size(buffer_size);
        let mut cursor = InflateCursor::with_options(options).unwrap();
        let mut source = ChunkedSource::new(segments[0].clone(), &schedule);

        let mut segment = cursor.attach(&mut source, segments[0].len()).unwrap();
        let mut decoded = Vec::with_capacity(data.len());
        let mut last_position = 0;
        while decoded.len() < data.len() {
            prop_assert_eq!(segment.ensure_available(1, 1, true).unwrap(), 1);
            decoded.push(segment.buffered()[0]);
            segment.advance(1).unwrap();
            prop_assert!(segment.position() > last_position);
            last_position = segment.position();
        }
        prop_assert_eq!(&decoded, &data);
        prop_assert_eq!(segment.position(), data.len() as u64);
        segment.reset().unwrap();
        prop_assert_eq!(cursor.budget(), 0);
    }
}

proptest! {
    #[test]
    fn test_segments_share_session(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..800), 1..6),
        skip in prop::collection::vec(0..800usize, 6),
        chunk in 1..300usize,
    ) {
        let segments = zlib_segments(&payloads);
        let stream = segments.concat();
        let mut cursor = InflateCursor::new();
        let mut source = ChunkedSource::new(stream, &[chunk]);
        let mut expected_position = 0u64;

        for (i, (data, payload)) in segments.iter().zip(payloads.iter()).enumerate() {
            let mut segment = cursor.attach(&mut source, data.len()).unwrap();
            prop_assert!(segment.buffered().is_empty());

            // Read only part of every segment; reset must still realign the stream
            let wanted = skip[i].min(payload.len());
            let mut decoded = vec![0u8; wanted];
            segment.read_bytes(&mut decoded).unwrap();
            prop_assert_eq!(&decoded[..], &payload[..wanted]);
            segment.reset().unwrap();

            expected_position += wanted as u64;
            prop_assert_eq!(cursor.position(), expected_position);
            prop_assert_eq!(cursor.budget(), 0);
        }
        prop_assert_eq!(source.remaining(), 0);
    }
}

proptest! {
    #[test]
    fn test_item_size_over_capacity_always_fails(
        buffer_size in 1..4096usize,
        extra in 1..100usize,
        wait in any::<bool>(),
    ) {
        let segments = zlib_segments(&[vec![1u8; 10]]);
        let options = CursorOptions::default().with_buffer_size(buffer_size);
        let mut cursor = InflateCursor::with_options(options).unwrap();
        let mut source = ChunkedSource::complete(segments[0].clone());

        let mut segment = cursor.attach(&mut source, segments[0].len()).unwrap();
        let err = segment.ensure_available(buffer_size + extra, 1, wait).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Capacity);
    }
}

proptest! {
    #[test]
    fn test_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 1..500)) {
        // Random bytes are rarely a valid zlib stream, but must only produce errors
        let mut cursor = InflateCursor::new();
        let mut source = ChunkedSource::complete(data.clone());
        let mut segment = cursor.attach(&mut source, data.len()).unwrap();
        let mut output = Vec::new();
        let _ = segment.read_to_vec(&mut output);
    }
}

proptest! {
    #[test]
    fn test_item_counts_never_over_read(
        data in prop::collection::vec(any::<u8>(), 1..3000),
        item_size in 1..32usize,
        n_items in 1..200usize,
    ) {
        let segments = zlib_segments(&[data.clone()]);
        let mut cursor = InflateCursor::with_options(
            CursorOptions::default().with_buffer_size(256),
        ).unwrap();
        let mut source = ChunkedSource::new(segments[0].clone(), &[5]);
        let mut segment = cursor.attach(&mut source, segments[0].len()).unwrap();

        let mut decoded = Vec::new();
        while data.len() - decoded.len() >= item_size {
            let n = segment.ensure_available(item_size, n_items, true).unwrap();
            prop_assert!(n >= 1 && n <= n_items);
            prop_assert!(n * item_size <= segment.buffered().len());
            decoded.extend_from_slice(&segment.buffered()[..n * item_size]);
            segment.advance(n * item_size).unwrap();
        }
        prop_assert_eq!(&decoded[..], &data[..decoded.len()]);
    }
}
