//! On-disk layout of a mapped ring.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    RingHeader (packed, 40B)                  │
//! │  ┌──────────┬──────────┬──────────┬──────────┬──────────┐    │
//! │  │  magic   │ version  │ capacity │   head   │   len    │    │
//! │  │  (8B)    │  (8B)    │  (8B)    │  (8B)    │  (8B)    │    │
//! │  └──────────┴──────────┴──────────┴──────────┴──────────┘    │
//! ├──────────────────────────────────────────────────────────────┤
//! │                  data: [u8; capacity]                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The header is `#[repr(C, packed)]` so the data bytes start right after it
//! with no padding, whatever the platform. Fields are native-endian; a ring
//! file is not meant to move between machines.

use spool_ring::RingCursor;
use std::mem::size_of;
use std::ptr;

/// ASCII "SPOOLRNG".
pub const RING_MAGIC: u64 = 0x5350_4F4F_4C52_4E47;

/// Bump on any incompatible layout change.
pub const RING_VERSION: u64 = 1;

/// Bytes occupied by [`RingHeader`] at offset 0.
pub const HEADER_LEN: usize = size_of::<RingHeader>();

/// Header at the start of every mapped ring.
///
/// `head` and `len` are the ring's cursor; they are rewritten each time a
/// [`RingGuard`](crate::RingGuard) is dropped so the ring state survives
/// process restarts.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingHeader {
    pub magic: u64,
    pub version: u64,
    pub capacity: u64,
    pub head: u64,
    pub len: u64,
}

impl RingHeader {
    /// Header for a freshly created, empty ring.
    pub fn new(capacity: u64) -> Self {
        Self {
            magic: RING_MAGIC,
            version: RING_VERSION,
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Reads the header from the start of `region`.
    ///
    /// # Panics
    /// Panics if `region` is shorter than [`HEADER_LEN`].
    pub fn load(region: &[u8]) -> Self {
        assert!(region.len() >= HEADER_LEN, "region shorter than ring header");
        // SAFETY: length checked above; the header is packed (align 1) and
        // every bit pattern is a valid u64, so an unaligned read is sound.
        unsafe { ptr::read_unaligned(region.as_ptr() as *const RingHeader) }
    }

    /// Writes the header to the start of `region`.
    ///
    /// # Panics
    /// Panics if `region` is shorter than [`HEADER_LEN`].
    pub fn store(&self, region: &mut [u8]) {
        assert!(region.len() >= HEADER_LEN, "region shorter than ring header");
        // SAFETY: length checked above; packed layout has no alignment requirement.
        unsafe { ptr::write_unaligned(region.as_mut_ptr() as *mut RingHeader, *self) }
    }

    pub fn cursor(&self) -> RingCursor {
        RingCursor {
            head: self.head as usize,
            len: self.len as usize,
        }
    }

    pub fn set_cursor(&mut self, cursor: RingCursor) {
        self.head = cursor.head as u64;
        self.len = cursor.len as u64;
    }

    /// Checks the header against the size of the region it was read from.
    ///
    /// Cursor bounds are checked again when a ring is bound to the data,
    /// since another process may have rewritten them in between.
    pub fn validate(&self, region_len: usize) -> Result<(), &'static str> {
        // copy out of the packed struct before comparing
        let (magic, version, capacity, head, len) =
            (self.magic, self.version, self.capacity, self.head, self.len);

        if magic != RING_MAGIC {
            return Err("Bad magic");
        }
        if version != RING_VERSION {
            return Err("Wrong version");
        }
        if capacity > region_len.saturating_sub(HEADER_LEN) as u64 {
            return Err("Capacity exceeds mapped region");
        }
        if len > capacity || (capacity == 0 && head != 0) || (capacity > 0 && head >= capacity) {
            return Err("Cursor out of range");
        }

        Ok(())
    }
}

/// Total bytes needed for a mapped ring of `capacity` data bytes.
pub fn bytes_for_ring(capacity: usize) -> usize {
    HEADER_LEN + capacity
}
