//! Fixed-capacity circular byte buffer over caller-supplied storage.
//!
//! The ring never allocates. It is bound once to a storage value `S`
//! (`[u8; N]`, `&mut [u8]`, `Vec<u8>`, a mapped region, ...) and a capacity,
//! and from then on only moves two numbers around: `head`, the index of the
//! oldest unconsumed byte, and `len`, the number of valid bytes.
//!
//! # Layout
//!
//! ```text
//! capacity = 8, head = 6, len = 4
//!
//!  index:   0    1    2    3    4    5    6    7
//!         ┌────┬────┬────┬────┬────┬────┬────┬────┐
//!         │ c  │ d  │    │    │    │    │ a  │ b  │
//!         └────┴────┴────┴────┴────┴────┴────┴────┘
//!                     ^ tail              ^ head
//!
//! logical order: a b c d   (segments [6, 8) then [0, 2))
//! ```
//!
//! # Short transfers
//!
//! Asking for more than is stored (or more than fits) is not an error: every
//! transfer returns the number of bytes it actually moved, which may be 0.

use crate::error::RingError;
use std::fmt;
use std::io;

/// The complete mutable state of a ring.
///
/// `head` is in `[0, capacity)` whenever `capacity > 0` and is 0 otherwise;
/// `len <= capacity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingCursor {
    pub head: usize,
    pub len: usize,
}

impl RingCursor {
    #[inline]
    fn is_valid_for(&self, capacity: usize) -> bool {
        let head_ok = if capacity == 0 {
            self.head == 0
        } else {
            self.head < capacity
        };
        head_ok && self.len <= capacity
    }
}

/// A byte ring with fixed capacity over storage of type `S`.
#[derive(Clone)]
pub struct ByteRing<S> {
    storage: S,
    capacity: usize,
    cursor: RingCursor,
}

/// A ring whose storage is declared inline, sized at compile time.
///
/// ```
/// use spool_ring::{ByteRing, InlineRing};
///
/// const EMPTY: InlineRing<4> = ByteRing::inline();
///
/// let mut ring = EMPTY;
/// assert_eq!(ring.write(&[10, 20, 30]), 3);
/// assert_eq!(ring.write(&[40, 50]), 1);
///
/// let mut out = [0u8; 4];
/// assert_eq!(ring.read(&mut out), 4);
/// assert_eq!(out, [10, 20, 30, 40]);
/// ```
pub type InlineRing<const N: usize> = ByteRing<[u8; N]>;

impl<const N: usize> ByteRing<[u8; N]> {
    /// Declares storage and ring together; capacity is `N`.
    pub const fn inline() -> Self {
        Self {
            storage: [0; N],
            capacity: N,
            cursor: RingCursor { head: 0, len: 0 },
        }
    }
}

impl<const N: usize> Default for ByteRing<[u8; N]> {
    fn default() -> Self {
        Self::inline()
    }
}

impl<S> ByteRing<S> {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of valid bytes currently stored.
    #[inline]
    pub fn size(&self) -> usize {
        self.cursor.len
    }

    /// Number of bytes that can be written before the ring is full.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity - self.cursor.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cursor.len == self.capacity
    }

    #[inline]
    pub fn cursor(&self) -> RingCursor {
        self.cursor
    }

    /// Index one past the newest byte. Only meaningful when `capacity > 0`.
    #[inline]
    fn tail(&self) -> usize {
        (self.cursor.head + self.cursor.len) % self.capacity
    }

    /// Consumes up to `count` bytes without copying them anywhere.
    ///
    /// Storage contents are left untouched.
    pub fn skip(&mut self, count: usize) -> usize {
        let n = self.cursor.len.min(count);
        if n > 0 {
            self.cursor.len -= n;
            self.cursor.head = (self.cursor.head + n) % self.capacity;
        }
        n
    }

    /// Returns the ring to its just-constructed state.
    pub fn reset(&mut self) {
        self.cursor = RingCursor::default();
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the storage back to the caller.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: AsRef<[u8]>> ByteRing<S> {
    /// Binds `capacity` slots of `storage` to an empty ring.
    ///
    /// `capacity` may be 0, in which case every transfer moves 0 bytes.
    ///
    /// # Errors
    /// [`RingError::StorageTooSmall`] if `storage` is shorter than `capacity`.
    pub fn new(capacity: usize, storage: S) -> Result<Self, RingError> {
        Self::from_parts(storage, capacity, RingCursor::default())
    }

    /// Binds all of `storage` to an empty ring.
    pub fn from_storage(storage: S) -> Self {
        let capacity = storage.as_ref().len();
        Self {
            storage,
            capacity,
            cursor: RingCursor::default(),
        }
    }

    /// Rebuilds a ring over storage whose cursor was kept elsewhere.
    ///
    /// # Errors
    /// - [`RingError::StorageTooSmall`] if `storage` is shorter than `capacity`
    /// - [`RingError::CursorOutOfRange`] if `cursor` breaks the ring invariants
    pub fn from_parts(storage: S, capacity: usize, cursor: RingCursor) -> Result<Self, RingError> {
        let storage_len = storage.as_ref().len();
        if storage_len < capacity {
            return Err(RingError::StorageTooSmall {
                capacity,
                storage: storage_len,
            });
        }
        if !cursor.is_valid_for(capacity) {
            return Err(RingError::CursorOutOfRange {
                head: cursor.head,
                len: cursor.len,
                capacity,
            });
        }
        Ok(Self {
            storage,
            capacity,
            cursor,
        })
    }

    #[inline]
    fn slots(&self) -> &[u8] {
        &self.storage.as_ref()[..self.capacity]
    }

    /// The valid bytes as up to two slices, in logical order.
    ///
    /// The second slice is empty unless the data wraps past the end of storage.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let RingCursor { head, len } = self.cursor;
        if len == 0 {
            return (&[], &[]);
        }
        let slots = self.slots();
        if len <= self.capacity - head {
            (&slots[head..head + len], &[])
        } else {
            let first = self.capacity - head;
            (&slots[head..], &slots[..len - first])
        }
    }

    /// Copies up to `buf.len()` bytes from the front of the ring into `buf`
    /// without consuming them.
    pub fn peek(&self, buf: &mut [u8]) -> usize {
        let n = self.cursor.len.min(buf.len());
        if n == 0 {
            return 0;
        }
        let (first, second) = self.as_slices();
        let k = first.len().min(n);
        buf[..k].copy_from_slice(&first[..k]);
        buf[k..n].copy_from_slice(&second[..n - k]);
        n
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> ByteRing<S> {
    #[inline]
    fn slots_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut self.storage.as_mut()[..capacity]
    }

    /// Copies up to `buf.len()` bytes out of the ring and consumes them.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = self.peek(buf);
        if n > 0 {
            self.skip(n);
        }
        n
    }

    /// Appends as much of `data` as fits, wrapping past the end of storage.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = self.available().min(data.len());
        if n == 0 {
            return 0;
        }
        // n > 0 implies capacity > 0
        let tail = self.tail();
        let first = (self.capacity - tail).min(n);
        let slots = self.slots_mut();
        slots[tail..tail + first].copy_from_slice(&data[..first]);
        slots[..n - first].copy_from_slice(&data[first..n]);
        self.cursor.len += n;
        n
    }

    /// Rotates storage in place so the valid bytes occupy `[0, len)`.
    ///
    /// Size and logical order are preserved. Costs O(capacity) when the
    /// head is not already at 0.
    pub fn realign(&mut self) {
        let head = self.cursor.head;
        if head == 0 {
            return;
        }
        self.slots_mut().rotate_left(head);
        self.cursor.head = 0;
    }

    /// Realigns and returns the valid bytes as one slice.
    pub fn make_contiguous(&mut self) -> &[u8] {
        self.realign();
        let len = self.cursor.len;
        &self.slots()[..len]
    }

    /// Moves up to `max_len` bytes from the front of `self` to the back of `dst`.
    ///
    /// See [`send`].
    pub fn send_to<D>(&mut self, dst: &mut ByteRing<D>, max_len: usize) -> usize
    where
        D: AsRef<[u8]> + AsMut<[u8]>,
    {
        send(dst, self, max_len)
    }
}

/// Transfers up to `max_len` bytes directly from `src` into `dst`.
///
/// The count moved is `min(src.size(), dst.available(), max_len)`. Bytes land
/// at `dst`'s tail in the order they had in `src`, then `src` skips past them.
/// Neither ring is realigned: each source segment is written through `dst`'s
/// own wrap split, so at most four slice copies happen.
pub fn send<D, S>(dst: &mut ByteRing<D>, src: &mut ByteRing<S>, max_len: usize) -> usize
where
    D: AsRef<[u8]> + AsMut<[u8]>,
    S: AsRef<[u8]>,
{
    let n = src.size().min(dst.available()).min(max_len);
    if n == 0 {
        return 0;
    }

    let (first, second) = src.as_slices();
    let k = first.len().min(n);
    let mut moved = dst.write(&first[..k]);
    moved += dst.write(&second[..n - k]);
    debug_assert_eq!(moved, n);

    src.skip(n);
    n
}

impl<S> fmt::Debug for ByteRing<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRing")
            .field("capacity", &self.capacity)
            .field("head", &self.cursor.head)
            .field("len", &self.cursor.len)
            .finish()
    }
}

/// `Ok(0)` means the ring is empty.
impl<S: AsRef<[u8]> + AsMut<[u8]>> io::Read for ByteRing<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(ByteRing::read(self, buf))
    }
}

/// `Ok(0)` means the ring is full, so `write_all` fails with `WriteZero`.
impl<S: AsRef<[u8]> + AsMut<[u8]>> io::Write for ByteRing<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(ByteRing::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
