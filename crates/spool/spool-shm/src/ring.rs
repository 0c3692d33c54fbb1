//! Creation-time parameters for a mapped ring.

use crate::shm_layout::bytes_for_ring;

/// Configuration for a mapped ring.
///
/// Unlike power-of-two slot rings, a byte ring accepts any capacity,
/// including 0 (a ring that never holds anything).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// Number of data bytes in the ring.
    pub capacity: usize,
}

impl RingConfig {
    /// ```
    /// use spool_shm::RingConfig;
    /// let cfg = RingConfig::new(4096);
    /// assert_eq!(cfg.region_len(), 40 + 4096);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Total bytes the backing file must hold: header plus data.
    #[inline]
    pub fn region_len(&self) -> usize {
        bytes_for_ring(self.capacity)
    }
}
