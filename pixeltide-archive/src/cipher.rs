//! Per-entry RC4 keystream, keyed by the MD5 digest of the entry's logical
//! name. Matches the "encrypted" archive flag's documented scheme.

use md5::{Digest, Md5};
use rc4::{consts::U16, KeyInit, Rc4, StreamCipher};

/// Builds the RC4 cipher for `name`, optionally dropping the first 256
/// keystream bytes (the archive's drop-256 hardening option).
pub fn cipher_for_entry(name: &str, drop_256: bool) -> Rc4<U16> {
    let digest = Md5::digest(name.as_bytes());
    let mut cipher = Rc4::new(&digest);
    if drop_256 {
        let mut drop = [0u8; 256];
        cipher.apply_keystream(&mut drop);
    }
    cipher
}

pub fn decrypt(cipher: &mut Rc4<U16>, data: &mut [u8]) {
    cipher.apply_keystream(data);
}
