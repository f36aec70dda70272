//! Read-only access to FAT12 volumes stored as flat disk images.
//!
//! Root directory only, short (8.3) names only — no subdirectory traversal,
//! no long file names, no write support. Disk I/O goes through [`Disk`],
//! which is generic over any `Read + Seek` store so the whole crate is
//! unit-testable against in-memory images.
//!
//! Typical call sequence:
//!
//! ```no_run
//! use fat12_reader::{Disk, Volume, FileStream};
//!
//! let mut disk = Disk::open("floppy.img")?;
//! let mut volume = Volume::open(&mut disk, 0)?;
//! let mut file = FileStream::open(&mut volume, "ENOUGH.TXT")?;
//! let mut buf = vec![0u8; file.size() as usize];
//! file.read(&mut buf)?;
//! # Ok::<(), fat12_reader::FsError>(())
//! ```

pub mod chain;
pub mod dir;
pub mod disk;
pub mod error;
pub mod file;
pub mod name;
pub mod volume;

pub use chain::ClusterChain;
pub use dir::{DirEntry, DirStream, ROOT_PATH};
pub use disk::{BLOCK_SIZE, Disk};
pub use error::{FsError, Result};
pub use file::FileStream;
pub use volume::{BootSector, Volume};
