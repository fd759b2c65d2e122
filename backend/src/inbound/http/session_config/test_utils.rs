//! Test helpers for session configuration.

use std::path::PathBuf;
use uuid::Uuid;

/// Key file in the temp directory, removed on drop.
#[derive(Debug)]
pub(super) struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    /// Write `len` bytes of dummy key material.
    pub(super) fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("coursehub-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len])?;
        Ok(Self { path })
    }

    pub(super) fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
