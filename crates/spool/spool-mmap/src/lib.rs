use memmap2::MmapMut;
use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

/// A file mapped read-write. The mapping owns the bytes a mapped ring binds to.
pub struct MmapFileMut {
    _file: File,
    mmap: MmapMut,
}

impl MmapFileMut {
    /// Sizes a fresh ring file to `size_bytes` (zero-filled) and maps it.
    ///
    /// An existing file at `path` is truncated first, discarding its ring.
    pub fn create_rw<P: AsRef<Path>>(path: P, size_bytes: u64) -> io::Result<Self> {
        let mut opts = OpenOptions::new();
        opts.create(true).truncate(true);
        let file = Self::open_file(path.as_ref(), &opts)?;
        file.set_len(size_bytes)?;
        Self::map(file)
    }

    /// Maps an existing ring file at its current length.
    pub fn open_rw<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = Self::open_file(path.as_ref(), &OpenOptions::new())?;
        Self::map(file)
    }

    fn open_file(path: &Path, opts: &OpenOptions) -> io::Result<File> {
        opts.clone().read(true).write(true).open(path)
    }

    fn map(file: File) -> io::Result<Self> {
        // SAFETY: a ring file is only ever resized by `create_rw`, before it
        // is mapped. Its length is fixed by the header's capacity for as long
        // as any `MmapFileMut` over it lives, and the ring types above this
        // one hand out the mapped bytes only through `&mut self`, so no slice
        // outlives the mapping or aliases another writer in this process.
        // Writers in other processes must not truncate the file and must
        // serialize with this one themselves.
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { _file: file, mmap })
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Flush outstanding modifications to the file
    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }
}
