//! Root directory decoding and enumeration.

use std::io::{Read, Seek};

use log::debug;

use crate::error::{FsError, Result};
use crate::name;
use crate::volume::Volume;

/// Size of one on-disk directory record.
pub const DIR_ENTRY_SIZE: usize = 32;

/// The only directory path this crate accepts.
pub const ROOT_PATH: &str = "\\";

pub(crate) const ATTR_READ_ONLY: u8 = 0x01;
pub(crate) const ATTR_HIDDEN: u8 = 0x02;
pub(crate) const ATTR_SYSTEM: u8 = 0x04;
pub(crate) const ATTR_VOLUME_ID: u8 = 0x08;
pub(crate) const ATTR_DIRECTORY: u8 = 0x10;
pub(crate) const ATTR_ARCHIVE: u8 = 0x20;
/// Directory and volume-label bits together mark "not a regular file".
pub(crate) const ATTR_NON_FILE: u8 = ATTR_DIRECTORY | ATTR_VOLUME_ID;

/// One 32-byte on-disk directory record, decoded field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDirEntry {
    pub name: [u8; 11],
    pub attributes: u8,
    pub reserved: u8,
    pub creation_time_fine: u8,
    pub creation_time: u16,
    pub creation_date: u16,
    pub access_date: u16,
    pub first_cluster_high: u16,
    pub write_time: u16,
    pub write_date: u16,
    pub first_cluster_low: u16,
    pub file_size: u32,
}

impl RawDirEntry {
    /// Decode one record. `record` must be exactly [`DIR_ENTRY_SIZE`] bytes.
    pub fn parse(record: &[u8]) -> RawDirEntry {
        assert_eq!(record.len(), DIR_ENTRY_SIZE);
        let u16_at = |off: usize| u16::from_le_bytes([record[off], record[off + 1]]);
        let mut raw_name = [0u8; 11];
        raw_name.copy_from_slice(&record[0..11]);
        RawDirEntry {
            name: raw_name,
            attributes: record[11],
            reserved: record[12],
            creation_time_fine: record[13],
            creation_time: u16_at(14),
            creation_date: u16_at(16),
            access_date: u16_at(18),
            first_cluster_high: u16_at(20),
            write_time: u16_at(22),
            write_date: u16_at(24),
            first_cluster_low: u16_at(26),
            file_size: u32::from_le_bytes([record[28], record[29], record[30], record[31]]),
        }
    }
}

/// Public view of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Display name, up to 12 characters including the separator.
    pub name: String,
    pub size: u32,
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub directory: bool,
    pub archived: bool,
}

impl DirEntry {
    /// Build the public view; `None` for unused/deleted slots.
    pub fn from_raw(raw: &RawDirEntry) -> Option<DirEntry> {
        let name = name::decode_83(&raw.name)?;
        Some(DirEntry {
            name,
            size: raw.file_size,
            read_only: raw.attributes & ATTR_READ_ONLY != 0,
            hidden: raw.attributes & ATTR_HIDDEN != 0,
            system: raw.attributes & ATTR_SYSTEM != 0,
            directory: raw.attributes & ATTR_DIRECTORY != 0,
            archived: raw.attributes & ATTR_ARCHIVE != 0,
        })
    }
}

/// Cursor over a snapshot of the root directory.
///
/// The whole region is loaded at open time; the stream never re-reads the
/// disk afterwards and advances monotonically.
pub struct DirStream {
    entries: Vec<RawDirEntry>,
    cursor: usize,
}

impl DirStream {
    /// Open the root directory. Only [`ROOT_PATH`] is accepted; any other
    /// path fails with [`FsError::NotFound`].
    pub fn open<S: Read + Seek>(volume: &mut Volume<'_, S>, path: &str) -> Result<DirStream> {
        if path != ROOT_PATH {
            return Err(FsError::NotFound);
        }
        let entries = volume.load_root_dir()?;
        debug!("root directory: {} slots", entries.len());
        Ok(DirStream { entries, cursor: 0 })
    }

    /// Next live entry in slot order, or `None` at end of the capacity.
    pub fn read_next(&mut self) -> Option<DirEntry> {
        while self.cursor < self.entries.len() {
            let raw = &self.entries[self.cursor];
            self.cursor += 1;
            if let Some(entry) = DirEntry::from_raw(raw) {
                return Some(entry);
            }
        }
        None
    }
}

impl Iterator for DirStream {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        self.read_next()
    }
}
