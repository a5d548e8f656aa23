//! Inline identifier strings
//!
//! Sensor and area ids are short ASCII tokens ("V02Q1940120", "gangnam").
//! Storing them inline keeps status records `Copy`-friendly and avoids any
//! heap allocation in the status map.

use core::fmt;

use crate::errors::{EngineError, EngineResult};

/// Maximum identifier length in bytes
///
/// Longer ids are rejected at ingestion rather than truncated.
pub const MAX_ID_LEN: usize = 23;

/// Fixed-capacity inline identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdStr {
    len: u8,
    data: [u8; MAX_ID_LEN],
}

impl IdStr {
    /// Create from a string slice; `None` if it exceeds [`MAX_ID_LEN`] bytes
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_ID_LEN {
            return None;
        }

        let mut data = [0u8; MAX_ID_LEN];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Create from a string slice, reporting the limit on failure
    ///
    /// Feed ingestion wants an error it can log; `new` is the `Option`
    /// form for lookups.
    pub fn try_new(s: &str) -> EngineResult<Self> {
        Self::new(s).ok_or(EngineError::IdTooLong { max: MAX_ID_LEN })
    }

    /// View as a string slice
    pub fn as_str(&self) -> &str {
        // Only valid UTF-8 enters through new()
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for IdStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for IdStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() applies the caller's width and alignment flags
        f.pad(self.as_str())
    }
}

impl PartialEq<&str> for IdStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
