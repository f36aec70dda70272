//! Block-level access to a flat volume image.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::error::{FsError, Result};

/// Fixed size of one addressable block.
pub const BLOCK_SIZE: usize = 512;

/// A block-addressable view of a byte store.
///
/// Generic over the backing store so tests run against `Cursor<Vec<u8>>`
/// while production code opens a [`File`]. The block count is computed once
/// at open time and never changes.
pub struct Disk<S> {
    store: S,
    block_count: u64,
}

impl Disk<File> {
    /// Open an image file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let disk = Self::from_store(file)?;
        debug!(
            "opened {} ({} blocks)",
            path.as_ref().display(),
            disk.block_count
        );
        Ok(disk)
    }
}

impl<S: Read + Seek> Disk<S> {
    /// Wrap any seekable byte store as a block device. Trailing bytes that
    /// do not fill a whole block are not addressable.
    pub fn from_store(mut store: S) -> Result<Self> {
        let len = store.seek(SeekFrom::End(0))?;
        store.seek(SeekFrom::Start(0))?;
        Ok(Disk {
            store,
            block_count: len / BLOCK_SIZE as u64,
        })
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Read `buf.len() / BLOCK_SIZE` whole blocks starting at `first_block`
    /// into `buf`, whose length must be a multiple of [`BLOCK_SIZE`].
    /// Returns the number of blocks read.
    ///
    /// Unlike the usual "short read means fewer blocks" contract, a short
    /// underlying read is an error: the requested range either arrives in
    /// full or the call fails.
    pub fn read(&mut self, first_block: u64, buf: &mut [u8]) -> Result<u64> {
        debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);
        let count = (buf.len() / BLOCK_SIZE) as u64;
        if first_block + count > self.block_count {
            return Err(FsError::OutOfRange);
        }
        self.store
            .seek(SeekFrom::Start(first_block * BLOCK_SIZE as u64))?;
        self.store.read_exact(buf)?;
        Ok(count)
    }

    /// Byte-granular read used by file streams. Still bounds-checked
    /// against the device's addressable range.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if offset + buf.len() as u64 > self.block_count * BLOCK_SIZE as u64 {
            return Err(FsError::OutOfRange);
        }
        self.store.seek(SeekFrom::Start(offset))?;
        self.store.read_exact(buf)?;
        Ok(())
    }
}
