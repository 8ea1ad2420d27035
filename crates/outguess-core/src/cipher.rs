//! Keyed byte-stream transform and the password holder.
//!
//! The transform XORs each byte with one byte of a 32-bit key derived from
//! the password. It is its own inverse and cannot fail. It offers no
//! authentication and no real confidentiality against an informed attacker;
//! the frame checksum is computed over its output, so a wrong password is
//! not detected.

use std::fmt::{self, Debug, Formatter};

use crate::hash::fnv1a_32;

/// Symmetric keyed stream: the same call transforms in both directions.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyedStream {
    key: u32,
}

impl Debug for KeyedStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("KeyedStream(****)")
    }
}

impl KeyedStream {
    pub fn from_password(password: &str) -> Self {
        Self {
            key: fnv1a_32(password.as_bytes()),
        }
    }

    #[inline]
    fn key_byte(&self, position: usize) -> u8 {
        (self.key >> ((position % 4) * 8)) as u8
    }

    /// Transform `data` in place.
    pub fn apply(&self, data: &mut [u8]) {
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= self.key_byte(i);
        }
    }

    /// Transform into a new buffer.
    pub fn transform(&self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply(&mut out);
        out
    }
}

/// An optional password whose `Debug` output never shows the secret.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Password(Option<String>);

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(password) = &self.0 {
            write!(f, "Password({})", "*".repeat(password.len()))
        } else {
            write!(f, "Password(None)")
        }
    }
}

impl Password {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// The keyed stream for this password, or `None` when payloads pass through unchanged.
    pub fn stream(&self) -> Option<KeyedStream> {
        self.0.as_deref().map(KeyedStream::from_password)
    }

    /// Apply the keyed stream if a password is set; otherwise return the bytes unchanged.
    pub fn transform(&self, data: &[u8]) -> Vec<u8> {
        match self.stream() {
            Some(stream) => stream.transform(data),
            None => data.to_vec(),
        }
    }
}

impl From<Option<String>> for Password {
    fn from(password: Option<String>) -> Self {
        Self(password)
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self(Some(password.to_string()))
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(Some(password))
    }
}

impl AsRef<Option<String>> for Password {
    fn as_ref(&self) -> &Option<String> {
        &self.0
    }
}
