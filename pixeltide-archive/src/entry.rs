use std::io::{Read, Seek, SeekFrom as IoSeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::errors::ArchiveError;

/// Directory entry: a logical name plus where its payload lives in the
/// archive file. `offset` is absolute from the start of the file.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub offset: u64,
    pub size: u32,
}

/// Reads one `{reserved, name_length, size, name, payload}` record, leaving
/// the stream positioned just past the payload (ready for the next record).
pub fn read_entry(mut reader: impl Read + Seek) -> Result<Entry, ArchiveError> {
    let _reserved = reader.read_u16::<LittleEndian>()?;
    let name_length = reader.read_u16::<LittleEndian>()?;
    let size = reader.read_u32::<LittleEndian>()?;

    let mut name_bytes = vec![0u8; name_length as usize];
    reader.read_exact(&mut name_bytes)?;
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    let offset = reader.stream_position()?;
    reader.seek(IoSeekFrom::Current(size as i64))?;

    Ok(Entry { name, offset, size })
}
