use std::fs::File;
use std::io::{Read, Seek, SeekFrom as IoSeekFrom};
use std::path::PathBuf;

use pixeltide_archive::Archive;
use pixeltide_shared::{ByteStream, SeekFrom};
use tracing::debug;

/// A single mount point: either an archive or a loose directory tree.
enum Mount {
    Archive(Archive),
    Directory(PathBuf),
}

/// Layered read-only filesystem. Mount points are searched in *reverse*
/// mount order: the most recently mounted point wins, so a later mount can
/// override assets from an earlier one.
#[derive(Default)]
pub struct Storage {
    mounts: Vec<Mount>,
}

impl Storage {
    pub fn new() -> Self {
        Storage { mounts: Vec::new() }
    }

    pub fn mount_archive(&mut self, archive: Archive) {
        self.mounts.push(Mount::Archive(archive));
    }

    pub fn mount_directory(&mut self, path: impl Into<PathBuf>) {
        self.mounts.push(Mount::Directory(path.into()));
    }

    /// Resolves `logical_name` against the mount stack, last-mounted first.
    pub fn open(&self, logical_name: &str) -> Option<Box<dyn ByteStream>> {
        for mount in self.mounts.iter().rev() {
            match mount {
                Mount::Archive(archive) => {
                    if archive.exists(logical_name) {
                        return archive.open_stream(logical_name).ok().map(|s| Box::new(s) as Box<dyn ByteStream>);
                    }
                }
                Mount::Directory(dir) => {
                    let path = dir.join(logical_name);
                    if let Ok(file) = File::open(&path) {
                        debug!("resolved `{logical_name}` to loose file `{}`", path.display());
                        return Some(Box::new(FileStream::new(file)));
                    }
                }
            }
        }
        None
    }

    pub fn exists(&self, logical_name: &str) -> bool {
        self.mounts.iter().rev().any(|mount| match mount {
            Mount::Archive(archive) => archive.exists(logical_name),
            Mount::Directory(dir) => dir.join(logical_name).is_file(),
        })
    }

    pub fn update(&mut self, _dt: f32) -> bool {
        true
    }
}

/// Adapts a loose on-disk file to the shared byte-transport contract.
struct FileStream {
    file: File,
    position: u64,
    len: u64,
}

impl FileStream {
    fn new(file: File) -> Self {
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);
        FileStream { file, position: 0, len }
    }
}

impl ByteStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let read = self.file.read(buf).unwrap_or(0);
        self.position += read as u64;
        read
    }

    fn seek(&mut self, offset: i64, whence: SeekFrom) -> bool {
        let target = match whence {
            SeekFrom::Set => IoSeekFrom::Start(offset.max(0) as u64),
            SeekFrom::Cur => IoSeekFrom::Current(offset),
        };
        match self.file.seek(target) {
            Ok(pos) => {
                self.position = pos;
                true
            }
            Err(_) => false,
        }
    }

    fn tell(&self) -> u64 {
        self.position
    }

    fn eof(&self) -> bool {
        self.position >= self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_mount_overrides_earlier_one() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::write(dir_a.path().join("shared.txt"), b"from-a").unwrap();
        std::fs::write(dir_b.path().join("shared.txt"), b"from-b").unwrap();

        let mut storage = Storage::new();
        storage.mount_directory(dir_a.path());
        storage.mount_directory(dir_b.path());

        let mut stream = storage.open("shared.txt").unwrap();
        let mut buf = [0u8; 6];
        stream.read(&mut buf);
        assert_eq!(&buf, b"from-b");
    }

    #[test]
    fn missing_entry_resolves_to_none() {
        let storage = Storage::new();
        assert!(storage.open("nothing").is_none());
    }
}
