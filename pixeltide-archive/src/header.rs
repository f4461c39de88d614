use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::errors::ArchiveError;

pub const SIGNATURE: &[u8; 8] = b"TOFUPAK!";
pub const FLAG_ENCRYPTED: u8 = 0x0001;

#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub version: u8,
    pub flags: u8,
    pub entries: u32,
}

impl Header {
    pub fn encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn read_from(mut reader: impl Read) -> Result<Self, ArchiveError> {
        let mut signature = [0u8; 8];
        reader.read_exact(&mut signature)?;
        if &signature != SIGNATURE {
            return Err(ArchiveError::BadSignature);
        }
        let version = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let _reserved = reader.read_u16::<LittleEndian>()?;
        let entries = reader.read_u32::<LittleEndian>()?;
        Ok(Header { version, flags, entries })
    }
}

/// Checks only the 8-byte signature, without parsing the rest of the header.
pub fn is_archive(mut reader: impl Read) -> bool {
    let mut signature = [0u8; 8];
    reader.read_exact(&mut signature).is_ok() && &signature == SIGNATURE
}
