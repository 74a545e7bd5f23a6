//! Keyed XOR stream decoding for archive tile payloads.
//!
//! Tiles arrive as an XOR-transformed byte stream. The keystream index
//! follows a fixed schedule over a 1024-byte key window: it starts at
//! offset 16, reads `key[j + 8]`, advances in 8-byte runs that jump
//! forward by 16, and hard-wraps at 1016 back to a small mod-24
//! residue. All of these are frozen protocol constants recovered from
//! the deployed client; any deviation silently corrupts every tile.
//!
//! XOR is involutive, so [`decode`] is its own inverse.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Minimum key buffer length the index schedule can address.
///
/// The running index `j` stays below 1016 and the stream reads
/// `key[j + 8]`, so the highest byte touched is offset 1023.
pub const MIN_KEY_LEN: usize = 1024;

/// Errors raised while loading key material.
#[derive(Debug)]
pub enum CipherError {
    /// The key resource could not be read.
    KeyRead { path: PathBuf, source: io::Error },

    /// The key buffer is too short for the cipher's index schedule.
    KeyTooShort { actual: usize },
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherError::KeyRead { path, source } => {
                write!(f, "Failed to read key file {}: {}", path.display(), source)
            }
            CipherError::KeyTooShort { actual } => {
                write!(
                    f,
                    "Key material is {} bytes, need at least {}",
                    actual, MIN_KEY_LEN
                )
            }
        }
    }
}

impl std::error::Error for CipherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CipherError::KeyRead { source, .. } => Some(source),
            CipherError::KeyTooShort { .. } => None,
        }
    }
}

/// Opaque decoding key, loaded once at startup and immutable afterwards.
#[derive(Clone)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Wraps a raw key buffer, validating it is long enough for the
    /// index schedule.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CipherError> {
        if bytes.len() < MIN_KEY_LEN {
            return Err(CipherError::KeyTooShort {
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Loads key material from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CipherError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CipherError::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; construction rejects empty buffers.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key bytes stay out of logs
        f.debug_struct("KeyMaterial")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Decodes an archive tile payload in place.
///
/// Pure function of (buffer, key): decoding the same bytes with the
/// same key always yields the same output, independent of calls before
/// or after. The constants in the index schedule are protocol values;
/// see the module docs.
pub fn decode(data: &mut [u8], key: &KeyMaterial) {
    let key = &key.bytes;
    let mut j: usize = 16;

    for byte in data.iter_mut() {
        *byte ^= key[j + 8];
        j += 1;
        if j % 8 == 0 {
            j += 16;
        }
        if j >= 1016 {
            j = (j + 8) % 24;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> KeyMaterial {
        // Deterministic non-trivial key: byte i holds i mod 256
        let bytes: Vec<u8> = (0..MIN_KEY_LEN).map(|i| (i % 256) as u8).collect();
        KeyMaterial::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_rejects_short_key() {
        let result = KeyMaterial::from_bytes(vec![0u8; 512]);
        assert!(matches!(
            result,
            Err(CipherError::KeyTooShort { actual: 512 })
        ));
    }

    #[test]
    fn test_accepts_minimum_key() {
        let key = KeyMaterial::from_bytes(vec![0u8; MIN_KEY_LEN]).unwrap();
        assert_eq!(key.len(), MIN_KEY_LEN);
    }

    #[test]
    fn test_zero_key_is_identity() {
        let key = KeyMaterial::from_bytes(vec![0u8; MIN_KEY_LEN]).unwrap();
        let mut data = vec![1u8, 2, 3, 4, 5];
        decode(&mut data, &key);
        assert_eq!(data, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_keystream_prefix() {
        // With key[i] = i, decoding zeros exposes the keystream. The
        // index starts at 16 reading key[24], runs 8 bytes, then jumps
        // to the run at key[48].
        let key = test_key();
        let mut data = vec![0u8; 16];
        decode(&mut data, &key);

        let expected: Vec<u8> = (24u8..32).chain(48..56).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_decode_is_involution() {
        let key = test_key();
        let original: Vec<u8> = (0..3000).map(|i| (i * 31 % 251) as u8).collect();

        let mut data = original.clone();
        decode(&mut data, &key);
        assert_ne!(data, original, "keystream should change the payload");

        decode(&mut data, &key);
        assert_eq!(data, original);
    }

    #[test]
    fn test_decode_is_stateless() {
        let key = test_key();

        let mut a = vec![0xABu8; 100];
        decode(&mut a, &key);

        // A second decode of a different buffer must not affect a
        // fresh decode of the same input
        let mut other = vec![0x11u8; 5000];
        decode(&mut other, &key);

        let mut b = vec![0xABu8; 100];
        decode(&mut b, &key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_debug_hides_bytes() {
        let key = test_key();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("len"));
        assert!(!rendered.contains("24, 25"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_involution_property(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
                let key = test_key();
                let mut buf = data.clone();
                decode(&mut buf, &key);
                decode(&mut buf, &key);
                prop_assert_eq!(buf, data);
            }

            #[test]
            fn test_prefix_consistency(
                data in proptest::collection::vec(any::<u8>(), 64..256),
                split in 1usize..64
            ) {
                // Decoding a prefix alone matches the prefix of the
                // full decode: the schedule has no length feedback
                let key = test_key();

                let mut full = data.clone();
                decode(&mut full, &key);

                let mut prefix = data[..split].to_vec();
                decode(&mut prefix, &key);

                prop_assert_eq!(&full[..split], &prefix[..]);
            }
        }
    }
}
