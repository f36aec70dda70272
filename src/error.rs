use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsError>;

/// Every failure the crate can report. One variant per failure class;
/// no shared error state, no retries, no silent downgrades.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad boot sector signature {found:#06x}, expected 0xaa55")]
    InvalidSignature { found: u16 },

    #[error("no such file or directory")]
    NotFound,

    #[error("entry is a directory or volume label, not a regular file")]
    IsADirectory,

    #[error("address or offset out of range")]
    OutOfRange,

    #[error("FAT region of {len} bytes is too short to decode")]
    FatTooShort { len: usize },

    #[error("cluster chain is corrupt at cluster {cluster}")]
    CorruptChain { cluster: u16 },
}
