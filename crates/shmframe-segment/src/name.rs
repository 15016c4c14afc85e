use std::ffi::{CStr, CString};
use std::fmt;

use crate::error::{Result, SegmentError};

/// A validated shared-memory key.
///
/// Keys are stored with a single leading `/`, which is what `shm_open`
/// expects. Callers may pass the key with or without it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SegmentName {
    key: CString,
}

impl SegmentName {
    /// Maximum key length including the leading slash.
    #[cfg(target_os = "macos")]
    pub const MAX_LEN: usize = 31;
    #[cfg(not(target_os = "macos"))]
    pub const MAX_LEN: usize = 255;

    /// Validate and normalize a segment name.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let raw = name.as_ref();
        let bare = raw.strip_prefix('/').unwrap_or(raw);

        let invalid = |reason| SegmentError::InvalidName {
            name: raw.to_string(),
            reason,
        };

        if bare.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if bare.contains('/') {
            return Err(invalid("name must not contain '/' after the leading slash"));
        }
        if bare.len() + 1 > Self::MAX_LEN {
            return Err(invalid("name exceeds the platform limit"));
        }

        let key = CString::new(format!("/{bare}")).map_err(|_| invalid("name contains NUL"))?;
        Ok(Self { key })
    }

    /// The normalized key, including the leading slash.
    pub fn as_str(&self) -> &str {
        // Built from a `&str` in `new`, so always valid UTF-8.
        self.key.to_str().unwrap_or_default()
    }

    pub(crate) fn as_c_str(&self) -> &CStr {
        &self.key
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SegmentName").field(&self.as_str()).finish()
    }
}
