//! Shared fixtures for the ring benchmarks.

use spool_ring::ByteRing;

pub fn temp_ring_path(label: &str) -> String {
    let pid = std::process::id();
    format!("/tmp/spool_bench_{label}_{pid}")
}

/// Deterministic, non-repeating-within-a-cache-line bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 131 % 251) as u8).collect()
}

/// A heap ring of `capacity` whose head sits at `head` and holds `len` bytes.
pub fn wrapped_ring(capacity: usize, head: usize, len: usize) -> ByteRing<Vec<u8>> {
    let mut ring = ByteRing::from_storage(vec![0u8; capacity]);
    ring.write(&payload(head));
    ring.skip(head);
    ring.write(&payload(len));
    ring
}
