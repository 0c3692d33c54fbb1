//! A byte ring whose storage and cursor live in a memory-mapped file.
//!
//! The mapped file is the ring's externally owned storage: `MappedRing`
//! keeps the mapping alive and hands out a [`RingGuard`], a short-lived
//! `ByteRing<&mut [u8]>` over the data bytes. Dropping the guard writes the
//! cursor back into the header, so the next guard (in this process or a later
//! one) picks up exactly where the last left off.
//!
//! # Thread Safety
//! None beyond what `&mut self` gives. Two processes mapping the same file
//! must coordinate externally; the header is not updated atomically.

use crate::ring::RingConfig;
use crate::shm_layout::{HEADER_LEN, RingHeader};
use spool_mmap::MmapFileMut;
use spool_ring::{ByteRing, RingCursor};
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::{debug, warn};

/// A persistent byte ring backed by a memory-mapped file.
pub struct MappedRing {
    mm: MmapFileMut,
    capacity: usize,
}

/// Borrowed view of a mapped ring; derefs to [`ByteRing`].
///
/// The cursor is stored back to the file header on drop.
pub struct RingGuard<'a> {
    header: &'a mut [u8],
    ring: ByteRing<&'a mut [u8]>,
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

impl MappedRing {
    /// Creates (or truncates) a ring file at `path` and writes an empty header.
    ///
    /// # Errors
    /// Returns an error if file creation or memory mapping fails.
    pub fn create<P: AsRef<Path>>(path: P, cfg: RingConfig) -> io::Result<Self> {
        let path = path.as_ref();
        let mut mm = MmapFileMut::create_rw(path, cfg.region_len() as u64)?;
        RingHeader::new(cfg.capacity as u64).store(mm.as_mut_slice());

        debug!(path = %path.display(), capacity = cfg.capacity, "created mapped ring");
        Ok(Self {
            mm,
            capacity: cfg.capacity,
        })
    }

    /// Maps an existing ring file, keeping whatever bytes it still holds.
    ///
    /// # Errors
    /// - File doesn't exist or can't be mapped
    /// - File too short, bad magic, wrong version, or a cursor out of range
    ///   (`io::ErrorKind::InvalidData`)
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let mm = MmapFileMut::open_rw(path)?;
        if mm.len() < HEADER_LEN {
            warn!(path = %path.display(), len = mm.len(), "ring file shorter than header");
            return Err(invalid_data("Region shorter than header"));
        }

        let header = RingHeader::load(mm.as_slice());
        if let Err(e) = header.validate(mm.len()) {
            warn!(path = %path.display(), error = e, "rejected ring file");
            return Err(invalid_data(e));
        }

        let cursor = header.cursor();
        let capacity = header.capacity as usize;
        debug!(
            path = %path.display(),
            capacity,
            head = cursor.head,
            len = cursor.len,
            "opened mapped ring"
        );
        Ok(Self { mm, capacity })
    }

    /// Opens `path` if it exists, otherwise creates it with `cfg`.
    ///
    /// An existing file keeps its own capacity; `cfg` is ignored for it.
    pub fn open_or_create<P: AsRef<Path>>(path: P, cfg: RingConfig) -> io::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, cfg)
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The cursor as last stored in the header.
    pub fn cursor(&self) -> RingCursor {
        RingHeader::load(self.mm.as_slice()).cursor()
    }

    /// Binds a ring to the mapped data bytes.
    ///
    /// # Errors
    /// `InvalidData` if the stored cursor was corrupted since the file was opened.
    pub fn ring(&mut self) -> io::Result<RingGuard<'_>> {
        let capacity = self.capacity;
        let (header, data) = self.mm.as_mut_slice().split_at_mut(HEADER_LEN);
        let cursor = RingHeader::load(header).cursor();
        let ring = ByteRing::from_parts(data, capacity, cursor).map_err(invalid_data)?;
        Ok(RingGuard { header, ring })
    }

    /// Flushes the header and data to the file.
    pub fn flush(&self) -> io::Result<()> {
        self.mm.flush()
    }
}

impl<'a> Deref for RingGuard<'a> {
    type Target = ByteRing<&'a mut [u8]>;

    fn deref(&self) -> &Self::Target {
        &self.ring
    }
}

impl DerefMut for RingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ring
    }
}

impl Drop for RingGuard<'_> {
    fn drop(&mut self) {
        let mut header = RingHeader::load(self.header);
        header.set_cursor(self.ring.cursor());
        header.store(self.header);
    }
}
