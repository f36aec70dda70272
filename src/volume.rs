//! Boot-sector parsing and volume geometry.

use std::io::{Read, Seek};

use log::debug;

use crate::dir::{DIR_ENTRY_SIZE, RawDirEntry};
use crate::disk::{BLOCK_SIZE, Disk};
use crate::error::{FsError, Result};

const BOOT_SIGNATURE: u16 = 0xAA55;

/// Decoded boot sector. Field order follows the on-disk layout; decoding is
/// explicit little-endian extraction at fixed offsets rather than a packed
/// struct cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSector {
    pub jump_code: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub root_dir_capacity: u16,
    pub sector_count: u16,
    pub media_type: u8,
    /// Size of one FAT copy, in sectors.
    pub fat_size: u16,
    pub sectors_per_track: u16,
    pub head_count: u16,
    pub hidden_sectors: u32,
    pub large_sector_count: u32,
    pub drive_number: u8,
    pub ext_boot_signature: u8,
    pub volume_serial: u32,
    pub volume_label: [u8; 11],
    pub fs_type_label: [u8; 8],
    pub signature: u16,
}

fn u16_at(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn u32_at(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

impl BootSector {
    /// Decode one boot-sector block. Rejects the block unless the trailing
    /// signature word is 0xAA55.
    pub fn parse(block: &[u8; BLOCK_SIZE]) -> Result<Self> {
        let signature = u16_at(block, 510);
        if signature != BOOT_SIGNATURE {
            return Err(FsError::InvalidSignature { found: signature });
        }

        let mut jump_code = [0u8; 3];
        jump_code.copy_from_slice(&block[0..3]);
        let mut oem_name = [0u8; 8];
        oem_name.copy_from_slice(&block[3..11]);
        let mut volume_label = [0u8; 11];
        volume_label.copy_from_slice(&block[43..54]);
        let mut fs_type_label = [0u8; 8];
        fs_type_label.copy_from_slice(&block[54..62]);

        Ok(BootSector {
            jump_code,
            oem_name,
            bytes_per_sector: u16_at(block, 11),
            sectors_per_cluster: block[13],
            reserved_sectors: u16_at(block, 14),
            fat_count: block[16],
            root_dir_capacity: u16_at(block, 17),
            sector_count: u16_at(block, 19),
            media_type: block[21],
            fat_size: u16_at(block, 22),
            sectors_per_track: u16_at(block, 24),
            head_count: u16_at(block, 26),
            hidden_sectors: u32_at(block, 28),
            large_sector_count: u32_at(block, 32),
            drive_number: block[36],
            ext_boot_signature: block[38],
            volume_serial: u32_at(block, 39),
            volume_label,
            fs_type_label,
            signature,
        })
    }
}

/// A mounted volume: parsed boot sector plus the device it was opened from.
/// The device outlives the volume and is borrowed for the volume's lifetime.
pub struct Volume<'d, S> {
    disk: &'d mut Disk<S>,
    boot: BootSector,
}

impl<'d, S: Read + Seek> Volume<'d, S> {
    /// Read the boot sector at `first_block` and bind the volume to `disk`.
    pub fn open(disk: &'d mut Disk<S>, first_block: u64) -> Result<Volume<'d, S>> {
        let mut block = [0u8; BLOCK_SIZE];
        disk.read(first_block, &mut block)?;
        let boot = BootSector::parse(&block)?;
        debug!(
            "volume: {} bytes/sector, {} sectors/cluster, {} FATs of {} sectors, {} root entries",
            boot.bytes_per_sector,
            boot.sectors_per_cluster,
            boot.fat_count,
            boot.fat_size,
            boot.root_dir_capacity
        );
        Ok(Volume { disk, boot })
    }

    pub fn boot_sector(&self) -> &BootSector {
        &self.boot
    }

    pub fn bytes_per_cluster(&self) -> u32 {
        self.boot.bytes_per_sector as u32 * self.boot.sectors_per_cluster as u32
    }

    /// First block of the FAT region (right after the reserved area).
    pub fn fat_start_block(&self) -> u64 {
        self.boot.reserved_sectors as u64
    }

    /// Blocks covered by all FAT copies together.
    pub fn fat_region_blocks(&self) -> u64 {
        self.boot.fat_count as u64 * self.boot.fat_size as u64
    }

    /// First block of the root directory region (after all FAT copies).
    pub fn root_dir_start_block(&self) -> u64 {
        self.fat_start_block() + self.fat_region_blocks()
    }

    /// Root directory region size in bytes.
    pub fn root_dir_bytes(&self) -> usize {
        self.boot.root_dir_capacity as usize * DIR_ENTRY_SIZE
    }

    /// Absolute byte address of the first byte of a data cluster.
    /// Cluster numbering starts at 2; anything below that is rejected.
    pub fn cluster_start_byte(&self, cluster: u16) -> Result<u64> {
        let index = (cluster as u64).checked_sub(2).ok_or(FsError::OutOfRange)?;
        Ok(self.root_dir_start_block() * self.boot.bytes_per_sector as u64
            + self.root_dir_bytes() as u64
            + self.bytes_per_cluster() as u64 * index)
    }

    /// Load the whole FAT region (every copy) in one read.
    pub fn load_fat(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.fat_region_blocks() as usize * BLOCK_SIZE];
        self.disk.read(self.fat_start_block(), &mut buf)?;
        Ok(buf)
    }

    /// Load the whole root directory region in one read and decode its
    /// fixed-size records.
    pub fn load_root_dir(&mut self) -> Result<Vec<RawDirEntry>> {
        let blocks = self.root_dir_bytes().div_ceil(BLOCK_SIZE);
        let mut buf = vec![0u8; blocks * BLOCK_SIZE];
        self.disk.read(self.root_dir_start_block(), &mut buf)?;
        Ok(buf[..self.root_dir_bytes()]
            .chunks_exact(DIR_ENTRY_SIZE)
            .map(RawDirEntry::parse)
            .collect())
    }

    /// Byte-granular device read, bounds-checked by the disk.
    pub(crate) fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.disk.read_at(offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn boot_block() -> [u8; BLOCK_SIZE] {
        let mut b = [0u8; BLOCK_SIZE];
        b[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        b[3..11].copy_from_slice(b"MSDOS5.0");
        b[11..13].copy_from_slice(&512u16.to_le_bytes());
        b[13] = 1; // sectors per cluster
        b[14..16].copy_from_slice(&1u16.to_le_bytes()); // reserved
        b[16] = 2; // FAT copies
        b[17..19].copy_from_slice(&224u16.to_le_bytes());
        b[19..21].copy_from_slice(&2880u16.to_le_bytes());
        b[21] = 0xF0;
        b[22..24].copy_from_slice(&9u16.to_le_bytes()); // FAT size
        b[24..26].copy_from_slice(&18u16.to_le_bytes());
        b[26..28].copy_from_slice(&2u16.to_le_bytes());
        b[38] = 0x29;
        b[39..43].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        b[43..54].copy_from_slice(b"NO NAME    ");
        b[54..62].copy_from_slice(b"FAT12   ");
        b[510..512].copy_from_slice(&0xAA55u16.to_le_bytes());
        b
    }

    #[test]
    fn parse_decodes_geometry_fields() {
        let boot = BootSector::parse(&boot_block()).unwrap();
        assert_eq!(boot.bytes_per_sector, 512);
        assert_eq!(boot.sectors_per_cluster, 1);
        assert_eq!(boot.reserved_sectors, 1);
        assert_eq!(boot.fat_count, 2);
        assert_eq!(boot.root_dir_capacity, 224);
        assert_eq!(boot.sector_count, 2880);
        assert_eq!(boot.fat_size, 9);
        assert_eq!(boot.volume_serial, 0xDEAD_BEEF);
        assert_eq!(&boot.fs_type_label, b"FAT12   ");
    }

    #[test]
    fn parse_rejects_bad_signature() {
        let mut block = boot_block();
        block[510] = 0x54;
        match BootSector::parse(&block) {
            Err(FsError::InvalidSignature { found }) => assert_eq!(found, 0xAA54),
            other => panic!("expected InvalidSignature, got {other:?}"),
        }
    }

    #[test]
    fn derived_layout_offsets() {
        let mut image = vec![0u8; 40 * BLOCK_SIZE];
        image[..BLOCK_SIZE].copy_from_slice(&boot_block());
        let mut disk = Disk::from_store(Cursor::new(image)).unwrap();
        let volume = Volume::open(&mut disk, 0).unwrap();

        // reserved 1 + 2 FATs of 9 sectors, then 224 * 32 bytes of root dir
        assert_eq!(volume.fat_start_block(), 1);
        assert_eq!(volume.root_dir_start_block(), 19);
        assert_eq!(volume.root_dir_bytes(), 224 * 32);
        assert_eq!(volume.bytes_per_cluster(), 512);
        assert_eq!(
            volume.cluster_start_byte(2).unwrap(),
            19 * 512 + 224 * 32
        );
        assert_eq!(
            volume.cluster_start_byte(3).unwrap(),
            19 * 512 + 224 * 32 + 512
        );
        assert!(matches!(
            volume.cluster_start_byte(1),
            Err(FsError::OutOfRange)
        ));
    }
}
