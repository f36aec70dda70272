//! FAT12 cluster-chain resolution.
//!
//! FAT12 packs two 12-bit entries into every three bytes. The byte pair for
//! cluster `c` starts at `c + c / 2`; odd clusters take the high 12 bits of
//! that pair, even clusters the low 12 bits.

use log::trace;

use crate::error::{FsError, Result};

/// The ordered clusters of one file, terminator excluded.
///
/// The end-of-chain sentinel is not a fixed constant: it is the 12-bit value
/// packed into FAT entry 0, read per table instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterChain {
    clusters: Vec<u16>,
    terminator: u16,
}

impl ClusterChain {
    /// Walk the packed table from `first_cluster` until the terminator.
    ///
    /// `fat` is the raw FAT region; at least 3 bytes are needed to decode
    /// the terminator and one full entry pair. A decoded index that falls
    /// outside the table, or a walk longer than the table can hold distinct
    /// entries, means the chain never reaches the terminator and fails with
    /// [`FsError::CorruptChain`] instead of looping.
    pub fn resolve(fat: &[u8], first_cluster: u16) -> Result<ClusterChain> {
        if fat.len() < 3 {
            return Err(FsError::FatTooShort { len: fat.len() });
        }
        let terminator = fat[0] as u16 | ((fat[1] & 0x0F) as u16) << 8;
        let max_entries = fat.len() * 2 / 3;

        let mut clusters = Vec::new();
        let mut current = first_cluster;
        while current != terminator {
            if clusters.len() >= max_entries {
                return Err(FsError::CorruptChain { cluster: current });
            }
            clusters.push(current);

            let index = current as usize + current as usize / 2;
            if index + 1 >= fat.len() {
                return Err(FsError::CorruptChain { cluster: current });
            }
            current = if current % 2 == 1 {
                (fat[index] as u16 >> 4) | (fat[index + 1] as u16) << 4
            } else {
                fat[index] as u16 | ((fat[index + 1] & 0x0F) as u16) << 8
            };
        }

        trace!(
            "chain from {first_cluster}: {} clusters, terminator {terminator:#05x}",
            clusters.len()
        );
        Ok(ClusterChain {
            clusters,
            terminator,
        })
    }

    pub fn clusters(&self) -> &[u16] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// End-of-chain sentinel derived from FAT entry 0.
    pub fn terminator(&self) -> u16 {
        self.terminator
    }
}
