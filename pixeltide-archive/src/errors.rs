/// Failure modes for opening or reading a TOFUPAK archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("i/o error reading archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("file does not start with the TOFUPAK! signature")]
    BadSignature,
    #[error("truncated archive: expected {expected} entries, read {read}")]
    Truncated { expected: u32, read: u32 },
    #[error("no entry named `{0}` in archive")]
    MissingEntry(String),
}
