//! Reader for the sequential TOFUPAK! asset archive format.
//!
//! An archive is a header followed by a flat sequence of named entries.
//! Entries are sorted by lowercased name at load time so lookups are a
//! binary search, mirroring the archive's own directory convention.

mod cipher;
mod entry;
mod errors;
mod header;

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom as IoSeekFrom};
use std::path::{Path, PathBuf};

pub use entry::Entry;
pub use errors::ArchiveError;
pub use header::{is_archive, Header, FLAG_ENCRYPTED, SIGNATURE};
use rc4::{consts::U16, Rc4};
use tracing::{debug, warn};

use pixeltide_shared::{ByteStream, SeekFrom};

/// An opened archive: its directory (sorted, for lookup) and the metadata
/// needed to decrypt entries on demand. The underlying file is reopened per
/// entry read rather than kept open, so many entries can be streamed
/// concurrently without sharing a seek cursor.
pub struct Archive {
    path: PathBuf,
    directory: Vec<Entry>,
    encrypted: bool,
    drop_256: bool,
}

impl Archive {
    /// Opens `path`, validates the signature, and reads the full directory.
    /// `drop_256` selects whether RC4 keystreams discard their first 256
    /// bytes (a configuration-time global per the archive's encryption
    /// scheme, not something the archive format itself records).
    pub fn open(path: impl AsRef<Path>, drop_256: bool) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let header = Header::read_from(&mut reader)?;

        let mut directory = Vec::with_capacity(header.entries as usize);
        for i in 0..header.entries {
            match entry::read_entry(&mut reader) {
                Ok(entry) => directory.push(entry),
                Err(err) => {
                    warn!("archive `{}` truncated after {i} of {} entries: {err}", path.display(), header.entries);
                    return Err(ArchiveError::Truncated { expected: header.entries, read: i });
                }
            }
        }
        directory.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        debug!("opened archive `{}` with {} entries ({}encrypted)",
            path.display(), directory.len(), if header.encrypted() { "" } else { "un" });

        Ok(Archive { path, directory, encrypted: header.encrypted(), drop_256 })
    }

    pub fn len(&self) -> usize {
        self.directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        let needle = name.to_lowercase();
        let idx = self.directory.binary_search_by(|e| e.name.to_lowercase().cmp(&needle)).ok()?;
        self.directory.get(idx)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Reads an entire entry's (decrypted, if applicable) payload into memory.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let entry = self.find(name).ok_or_else(|| ArchiveError::MissingEntry(name.to_string()))?;

        let mut file = File::open(&self.path)?;
        file.seek(IoSeekFrom::Start(entry.offset))?;
        let mut payload = vec![0u8; entry.size as usize];
        file.read_exact(&mut payload)?;

        if self.encrypted {
            let mut rc4 = cipher::cipher_for_entry(&entry.name, self.drop_256);
            cipher::decrypt(&mut rc4, &mut payload);
        }
        Ok(payload)
    }

    /// Opens a streamable, seekable view over an entry for incremental
    /// decoding, conforming to the shared byte-transport contract.
    pub fn open_stream(&self, name: &str) -> Result<EntryStream, ArchiveError> {
        let entry = self.find(name).ok_or_else(|| ArchiveError::MissingEntry(name.to_string()))?;
        let mut file = File::open(&self.path)?;
        file.seek(IoSeekFrom::Start(entry.offset))?;

        let cipher = self.encrypted.then(|| cipher::cipher_for_entry(&entry.name, self.drop_256));
        Ok(EntryStream {
            file,
            name: entry.name.clone(),
            base_offset: entry.offset,
            size: entry.size as u64,
            position: 0,
            drop_256: self.drop_256,
            cipher,
        })
    }
}

/// A seekable byte stream over one archive entry's payload. RC4 is a stream
/// cipher with no random-access seek primitive, so re-seeking re-derives the
/// keystream from the entry's start and discards the skipped prefix; this
/// keeps decryption correct at the cost of redoing work on backward seeks,
/// which decoders rarely perform.
pub struct EntryStream {
    file: File,
    name: String,
    base_offset: u64,
    size: u64,
    position: u64,
    drop_256: bool,
    cipher: Option<Rc4<U16>>,
}

impl ByteStream for EntryStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let remaining = self.size.saturating_sub(self.position);
        let to_read = (buf.len() as u64).min(remaining) as usize;
        if to_read == 0 {
            return 0;
        }
        let read = match self.file.read(&mut buf[..to_read]) {
            Ok(n) => n,
            Err(_) => return 0,
        };
        if let Some(cipher) = &mut self.cipher {
            cipher::decrypt(cipher, &mut buf[..read]);
        }
        self.position += read as u64;
        read
    }

    fn seek(&mut self, offset: i64, whence: SeekFrom) -> bool {
        let target = match whence {
            SeekFrom::Set => offset,
            SeekFrom::Cur => self.position as i64 + offset,
        };
        if target < 0 || target as u64 > self.size {
            return false;
        }
        if self.file.seek(IoSeekFrom::Start(self.base_offset + target as u64)).is_err() {
            return false;
        }
        self.position = target as u64;

        if self.cipher.is_some() {
            let mut cipher = cipher::cipher_for_entry(&self.name, self.drop_256);
            let mut discard = vec![0u8; self.position as usize];
            cipher::decrypt(&mut cipher, &mut discard);
            self.cipher = Some(cipher);
        }
        true
    }

    fn tell(&self) -> u64 {
        self.position
    }

    fn eof(&self) -> bool {
        self.position >= self.size
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use byteorder::{LittleEndian, WriteBytesExt};

    use super::*;

    fn write_archive(path: &Path, flags: u8, entries: &[(&str, &[u8])]) {
        let mut file = File::create(path).unwrap();
        file.write_all(SIGNATURE).unwrap();
        file.write_u8(1).unwrap();
        file.write_u8(flags).unwrap();
        file.write_u16::<LittleEndian>(0).unwrap();
        file.write_u32::<LittleEndian>(entries.len() as u32).unwrap();

        for (name, payload) in entries {
            let body: Vec<u8> = if flags & FLAG_ENCRYPTED != 0 {
                let mut cipher = cipher::cipher_for_entry(name, false);
                let mut encrypted = payload.to_vec();
                cipher::decrypt(&mut cipher, &mut encrypted); // RC4 is its own inverse.
                encrypted
            } else {
                payload.to_vec()
            };

            file.write_u16::<LittleEndian>(0).unwrap();
            file.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            file.write_u32::<LittleEndian>(body.len() as u32).unwrap();
            file.write_all(name.as_bytes()).unwrap();
            file.write_all(&body).unwrap();
        }
    }

    #[test]
    fn reads_plain_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.pak");
        write_archive(&path, 0, &[("sprites/hero.png", b"hero-bytes"), ("levels/1.map", b"map-bytes")]);

        let archive = Archive::open(&path, false).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.exists("sprites/hero.png"));
        assert_eq!(archive.read_entry("sprites/hero.png").unwrap(), b"hero-bytes");
        assert!(!archive.exists("missing"));
    }

    #[test]
    fn decrypts_entries_with_matching_name_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.pak");
        write_archive(&path, FLAG_ENCRYPTED, &[("music/theme.flac", b"pcm-data-here")]);

        let archive = Archive::open(&path, false).unwrap();
        assert_eq!(archive.read_entry("music/theme.flac").unwrap(), b"pcm-data-here");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.pak");
        write_archive(&path, 0, &[("Sprites/Hero.PNG", b"hero")]);

        let archive = Archive::open(&path, false).unwrap();
        assert!(archive.exists("sprites/hero.png"));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-archive.bin");
        std::fs::write(&path, b"NOT-A-PAK-FILE-AT-ALL").unwrap();

        let err = Archive::open(&path, false).unwrap_err();
        assert!(matches!(err, ArchiveError::BadSignature));
    }

    #[test]
    fn entry_stream_reads_sequentially() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.pak");
        write_archive(&path, 0, &[("stream.raw", b"0123456789")]);

        let archive = Archive::open(&path, false).unwrap();
        let mut stream = archive.open_stream("stream.raw").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf), 4);
        assert_eq!(&buf, b"0123");
        assert!(!stream.eof());

        let mut rest = [0u8; 10];
        let n = stream.read(&mut rest);
        assert_eq!(&rest[..n], b"456789");
        assert!(stream.eof());
    }

    #[test]
    fn entry_stream_seek_resyncs_encrypted_keystream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.pak");
        write_archive(&path, FLAG_ENCRYPTED, &[("sfx/blip.raw", b"abcdefghij")]);

        let archive = Archive::open(&path, false).unwrap();
        let mut stream = archive.open_stream("sfx/blip.raw").unwrap();

        let mut first = [0u8; 5];
        stream.read(&mut first);
        assert_eq!(&first, b"abcde");

        assert!(stream.seek(0, SeekFrom::Set));
        let mut reread = [0u8; 5];
        stream.read(&mut reread);
        assert_eq!(&reread, b"abcde");
    }
}
