use std::path::PathBuf;

use uuid::Uuid;

use crate::error::AppError;

/// A file accepted from a client and persisted to disk: the name the client
/// sent, plus the storage-relative path it lives under (subdir-joined, the
/// same shape the static file service exposes).
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub relative_path: String,
}

// Helper to get file extension
pub fn get_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin")
        .to_string()
}

/// Disk-backed upload handler. Files land under `<root>/<subdir>/` with a
/// generated UUID name so client filenames never touch the filesystem.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    subdir: String,
}

impl LocalStorage {
    pub fn new(root: &str, subdir: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            subdir: subdir.to_string(),
        }
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(&self.subdir)).await
    }

    /// Stores uploaded bytes, keeping the client file's extension.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<StoredFile, AppError> {
        let ext = get_extension(original_name);
        self.store_with_ext(original_name, data, &ext).await
    }

    /// Stores server-generated bytes (e.g. a re-encoded thumbnail) under an
    /// explicit extension.
    pub async fn store_with_ext(
        &self,
        original_name: &str,
        data: &[u8],
        ext: &str,
    ) -> Result<StoredFile, AppError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let dir = self.root.join(&self.subdir);

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!("Failed to create upload directory {:?}: {}", dir, e);
            AppError::InternalServerError(format!("Failed to create upload directory: {}", e))
        })?;

        let path = dir.join(&file_name);
        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write uploaded file {:?}: {}", path, e);
            AppError::InternalServerError(format!("Failed to store uploaded file: {}", e))
        })?;

        Ok(StoredFile {
            original_name: original_name.to_string(),
            relative_path: format!("{}/{}", self.subdir, file_name),
        })
    }
}
