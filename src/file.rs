//! Random-access reads over one file's cluster chain.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::chain::ClusterChain;
use crate::dir::{ATTR_NON_FILE, RawDirEntry};
use crate::error::{FsError, Result};
use crate::name;
use crate::volume::Volume;

/// An open file: a copy of its directory record, its resolved cluster
/// chain, and a byte offset in `0..=size`.
///
/// The stream borrows the volume for its lifetime, so access through one
/// device is serialized by construction.
pub struct FileStream<'v, 'd, S> {
    volume: &'v mut Volume<'d, S>,
    entry: RawDirEntry,
    chain: ClusterChain,
    pos: u32,
}

impl<'v, 'd, S: Read + Seek> FileStream<'v, 'd, S> {
    /// Look `file_name` up in the root directory and open it.
    ///
    /// The requested name is encoded to its 8.3 form and compared
    /// byte-for-byte (case preserved) against each stored record; the first
    /// match wins. A match carrying the directory or volume-label bit fails
    /// with [`FsError::IsADirectory`].
    pub fn open(
        volume: &'v mut Volume<'d, S>,
        file_name: &str,
    ) -> Result<FileStream<'v, 'd, S>> {
        let (base, ext) = name::encode_83(file_name);
        let entry = volume
            .load_root_dir()?
            .into_iter()
            .find(|e| e.name[..8] == base && e.name[8..] == ext)
            .ok_or(FsError::NotFound)?;

        if entry.attributes & ATTR_NON_FILE != 0 {
            return Err(FsError::IsADirectory);
        }

        let fat = volume.load_fat()?;
        let chain = ClusterChain::resolve(&fat, entry.first_cluster_low)?;
        debug!(
            "opened {file_name}: {} bytes over {} clusters",
            entry.file_size,
            chain.len()
        );
        Ok(FileStream {
            volume,
            entry,
            chain,
            pos: 0,
        })
    }

    /// File size from the directory record.
    pub fn size(&self) -> u32 {
        self.entry.file_size
    }

    /// Current byte offset.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// The resolved cluster chain backing this file.
    pub fn chain(&self) -> &ClusterChain {
        &self.chain
    }

    /// Read up to `buf.len()` bytes at the current offset, clamped by the
    /// remaining chain and by the file's logical size. Returns the bytes
    /// transferred; 0 means end of file.
    ///
    /// The offset is translated into a chain index (`pos / bytes_per_cluster`)
    /// and an intra-cluster skip (`pos % bytes_per_cluster`); each remaining
    /// cluster is then read at its absolute device address.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let bytes_per_cluster = self.volume.bytes_per_cluster() as u64;
        let size = self.entry.file_size as u64;

        let mut index = (self.pos as u64 / bytes_per_cluster) as usize;
        let mut skip = self.pos as u64 % bytes_per_cluster;
        let mut transferred = 0usize;

        while index < self.chain.len() && transferred < buf.len() && (self.pos as u64) < size {
            let cluster = self.chain.clusters()[index];
            let address = self.volume.cluster_start_byte(cluster)? + skip;
            let want = (bytes_per_cluster - skip)
                .min((buf.len() - transferred) as u64)
                .min(size - self.pos as u64) as usize;

            self.volume
                .read_bytes(address, &mut buf[transferred..transferred + want])?;

            self.pos += want as u32;
            transferred += want;
            skip = 0;
            index += 1;
        }
        Ok(transferred)
    }

    /// Move the offset. The result must land in `[0, size]` inclusive;
    /// otherwise the call fails and the offset is unchanged.
    pub fn seek(&mut self, target: SeekFrom) -> Result<u32> {
        let size = self.entry.file_size as i64;
        let new_pos = match target {
            SeekFrom::Start(offset) => i64::try_from(offset).map_err(|_| FsError::OutOfRange)?,
            SeekFrom::Current(offset) => (self.pos as i64)
                .checked_add(offset)
                .ok_or(FsError::OutOfRange)?,
            SeekFrom::End(offset) => size.checked_add(offset).ok_or(FsError::OutOfRange)?,
        };
        if new_pos < 0 || new_pos > size {
            return Err(FsError::OutOfRange);
        }
        self.pos = new_pos as u32;
        Ok(self.pos)
    }
}
