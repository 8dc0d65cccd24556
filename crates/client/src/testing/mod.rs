//! Testing utilities for Splunk search client tests.
//!
//! Helpers for loading fixtures and turning payloads into byte streams.
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use splunk_search::testing::{load_fixture_text, stream_from_chunks};
//!
//! let payload = load_fixture_text("export/two_rows.json");
//! let stream = stream_from_chunks(vec![payload.into_bytes()]);
//! ```

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

use crate::results::ByteStream;

fn fixture_path(fixture_path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path)
}

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    serde_json::from_str(&load_fixture_text(fixture_path)).expect("Invalid JSON in fixture")
}

/// Load a fixture file verbatim.
///
/// # Panics
/// If the fixture file cannot be read.
pub fn load_fixture_text(path: &str) -> String {
    let full_path = fixture_path(path);
    std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()))
}

/// A byte stream that yields each chunk in order, then ends.
pub fn stream_from_chunks(chunks: Vec<Vec<u8>>) -> ByteStream {
    let items: Vec<crate::Result<Bytes>> = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
    Box::pin(futures::stream::iter(items))
}

/// A byte stream that bumps a shared counter when it is dropped.
struct CountedRelease {
    inner: ByteStream,
    releases: Arc<AtomicUsize>,
}

impl Stream for CountedRelease {
    type Item = crate::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for CountedRelease {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Like [`stream_from_chunks`], plus a counter of how many times the stream
/// was released. Use it to check a consumer drops its input exactly once.
pub fn stream_with_release_count(chunks: Vec<Vec<u8>>) -> (ByteStream, Arc<AtomicUsize>) {
    let releases = Arc::new(AtomicUsize::new(0));
    let stream = CountedRelease {
        inner: stream_from_chunks(chunks),
        releases: releases.clone(),
    };
    (Box::pin(stream), releases)
}

/// Split `payload` into chunks at the given byte offsets.
///
/// Offsets past the end or out of order are ignored.
pub fn split_at_offsets(payload: &[u8], offsets: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &offset in offsets {
        if offset > start && offset < payload.len() {
            chunks.push(payload[start..offset].to_vec());
            start = offset;
        }
    }
    chunks.push(payload[start..].to_vec());
    chunks
}
