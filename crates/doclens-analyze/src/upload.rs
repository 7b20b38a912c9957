//! Upload acceptance: a file is taken by name and size only.

use std::path::{Path, PathBuf};

use doclens_core::FileHandle;
use doclens_core::config::UploadConfig;
use thiserror::Error;
use tracing::debug;

/// Why a selected file was not accepted. Nothing is changed when this occurs.
#[derive(Debug, Error)]
pub enum InputRejected {
    #[error("{name}: unsupported file type (accepted: {accepted})")]
    UnsupportedType { name: String, accepted: String },

    #[error("{name}: {size} bytes exceeds the {max} byte limit")]
    TooLarge { name: String, size: u64, max: u64 },

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accepted extensions and size limit for uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    accepted_extensions: Vec<String>,
    max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl UploadPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            accepted_extensions: config
                .accepted_extensions
                .iter()
                .map(|e| e.trim().to_ascii_lowercase())
                .collect(),
            max_bytes: config.max_bytes,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.accepted_extensions
    }

    /// Check a file handle against the policy.
    pub fn validate(&self, file: &FileHandle) -> Result<(), InputRejected> {
        let accepted = file
            .extension()
            .is_some_and(|ext| self.accepted_extensions.iter().any(|a| *a == ext));
        if !accepted {
            return Err(InputRejected::UnsupportedType {
                name: file.name.clone(),
                accepted: self.accepted_extensions.join(", "),
            });
        }
        if file.size_bytes > self.max_bytes {
            return Err(InputRejected::TooLarge {
                name: file.name.clone(),
                size: file.size_bytes,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Build a handle from file metadata and validate it. The content is never opened.
    pub fn accept_path(&self, path: &Path) -> Result<FileHandle, InputRejected> {
        let meta = std::fs::metadata(path).map_err(|source| InputRejected::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(InputRejected::Unreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = FileHandle::new(name, meta.len());
        self.validate(&file)?;
        debug!(name = %file.name, size = file.size_bytes, "upload accepted");
        Ok(file)
    }
}
