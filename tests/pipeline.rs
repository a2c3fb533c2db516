//! End-to-end conversion pipeline: raw batches in, canonical wide-RGBA
//! windows (or no-ops) out, the way a streaming host would drive it.

use rechunk::{BatchWindow, ConvertError, DocumentCache, PixelBuffer, SourceLayout};

fn pattern(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

#[test]
fn streaming_identical_frames_sends_one_update() {
    let cache = DocumentCache::new();
    let frame = pattern(64 * 4);
    let buf = PixelBuffer::new(&frame, 4, SourceLayout::Chunky).unwrap();
    let window = BatchWindow::full(64);

    let first = cache.convert_batch(1, &buf, window, false).unwrap();
    let units = first.into_units().unwrap();
    assert_eq!(units.len(), 64 * 4);
    assert!(units.iter().all(|&u| u <= 255));

    // The host re-sends every frame; only actual edits should go downstream.
    for _ in 0..4 {
        assert!(cache.convert_batch(1, &buf, window, false).unwrap().is_unchanged());
    }

    let mut edited = frame.clone();
    edited[100] ^= 0xFF;
    let buf = PixelBuffer::new(&edited, 4, SourceLayout::Chunky).unwrap();
    assert!(!cache.convert_batch(1, &buf, window, false).unwrap().is_unchanged());
}

#[test]
fn planar_batches_cover_a_large_plane_in_windows() {
    let cache = DocumentCache::new();
    let plane = 1000;
    let data = pattern(plane * 3);
    let buf = PixelBuffer::new(&data, 3, SourceLayout::Planar).unwrap();

    // Convert in four windows; every output pixel must carry synthesized alpha.
    for start in (0..plane).step_by(250) {
        let result = cache
            .convert_batch(2, &buf, BatchWindow::new(start, 250), false)
            .unwrap();
        let units = result.into_units().unwrap();
        assert_eq!(units.len(), 250 * 4);
        for px in units.chunks_exact(4) {
            assert_eq!(px[3], 255);
        }
    }

    // A second pass over the same data is a complete no-op.
    for start in (0..plane).step_by(250) {
        assert!(
            cache
                .convert_batch(2, &buf, BatchWindow::new(start, 250), false)
                .unwrap()
                .is_unchanged()
        );
    }
}

#[test]
fn windows_observe_edits_from_other_windows() {
    let cache = DocumentCache::new();
    let plane = 8;
    let mut data = pattern(plane * 4);
    let buf = PixelBuffer::new(&data, 4, SourceLayout::Chunky).unwrap();
    cache.convert_batch(3, &buf, BatchWindow::full(plane), false).unwrap();

    // Edit a pixel inside the second half, then re-send each half.
    data[5 * 4 + 1] = 77;
    let buf = PixelBuffer::new(&data, 4, SourceLayout::Chunky).unwrap();
    assert!(
        cache
            .convert_batch(3, &buf, BatchWindow::new(0, 4), false)
            .unwrap()
            .is_unchanged()
    );
    let back = cache
        .convert_batch(3, &buf, BatchWindow::new(4, 4), false)
        .unwrap();
    assert_eq!(back.units().unwrap()[(5 - 4) * 4 + 1], 77);
}

#[test]
fn force_update_resends_identical_data() {
    let cache = DocumentCache::new();
    let data = pattern(16 * 4);
    let buf = PixelBuffer::new(&data, 4, SourceLayout::Chunky).unwrap();
    let window = BatchWindow::full(16);

    cache.convert_batch(4, &buf, window, false).unwrap();
    let forced = cache.convert_batch(4, &buf, window, true).unwrap();
    assert_eq!(forced.units().unwrap().len(), 16 * 4);
}

#[test]
fn resized_document_starts_from_zero() {
    let cache = DocumentCache::new();
    let small = pattern(16 * 4);
    let buf = PixelBuffer::new(&small, 4, SourceLayout::Chunky).unwrap();
    cache.convert_batch(5, &buf, BatchWindow::full(16), false).unwrap();

    // Resolution change: same id, bigger plane. All-zero data over the old
    // range compares equal to the fresh zero-filled canonical buffer.
    let big = vec![0u8; 64 * 4];
    let buf = PixelBuffer::new(&big, 4, SourceLayout::Chunky).unwrap();
    assert!(
        cache
            .convert_batch(5, &buf, BatchWindow::new(0, 16), false)
            .unwrap()
            .is_unchanged()
    );
}

#[test]
fn closing_a_document_is_equivalent_to_a_fresh_id() {
    let cache = DocumentCache::new();
    let data = pattern(32 * 3);
    let buf = PixelBuffer::new(&data, 3, SourceLayout::Planar).unwrap();
    let window = BatchWindow::full(32);

    let fresh = cache.convert_batch(6, &buf, window, false).unwrap();
    cache.convert_batch(6, &buf, window, false).unwrap();
    cache.close_document(6);

    let reopened = cache.convert_batch(6, &buf, window, false).unwrap();
    assert_eq!(reopened, fresh);
}

#[test]
fn geometry_violations_surface_as_errors_not_panics() {
    let cache = DocumentCache::new();

    assert_eq!(
        PixelBuffer::new(&[0u8; 10], 2, SourceLayout::Chunky).unwrap_err(),
        ConvertError::UnsupportedComponents(2)
    );
    assert_eq!(
        PixelBuffer::new(&[0u8; 10], 4, SourceLayout::Planar).unwrap_err(),
        ConvertError::NotPixelAligned
    );

    let data = pattern(4 * 4);
    let buf = PixelBuffer::new(&data, 4, SourceLayout::Chunky).unwrap();
    assert_eq!(
        cache
            .convert_batch(8, &buf, BatchWindow::new(2, 4), false)
            .unwrap_err(),
        ConvertError::WindowOutOfBounds
    );
}

#[test]
fn single_shot_conversion_needs_no_cache() {
    // The uncached whole-plane path a one-off caller uses.
    let data = pattern(12 * 3);
    let buf = PixelBuffer::new(&data, 3, SourceLayout::Chunky).unwrap();
    let units = buf.widen_to_rgba().unwrap();
    assert_eq!(units.len(), 12 * 4);
    for (px, src) in units.chunks_exact(4).zip(data.chunks_exact(3)) {
        assert_eq!(px[..3], src.iter().map(|&b| u16::from(b)).collect::<Vec<_>>()[..]);
        assert_eq!(px[3], 255);
    }
}
