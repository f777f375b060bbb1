//! Request-scoped temporary files.
//!
//! pdfium and Tesseract both want a file-system path, so uploaded bytes and
//! intermediate rasters are staged on disk. Each [`TempResource`] wraps a
//! [`tempfile::NamedTempFile`]: the file is unlinked when the handle is
//! dropped, which covers early `?` returns, panics unwinding through the
//! request, and the normal path alike. [`TempResource::release`] exists for
//! callers that want to observe deletion errors.

use crate::error::ExtractError;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Creates [`TempResource`]s in a configured directory.
///
/// Cheap to clone; clones share the live-resource counter.
#[derive(Debug, Clone)]
pub struct TempResourceManager {
    dir: Option<PathBuf>,
    live: Arc<AtomicUsize>,
}

impl TempResourceManager {
    /// Stage files under `dir`, or the OS temp directory when `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Directory new resources are created in.
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Number of resources created by this manager that still exist.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Create an empty temporary file whose name ends with `suffix`.
    pub fn acquire(&self, suffix: &str) -> Result<TempResource, ExtractError> {
        let dir = self.dir();
        let file = tempfile::Builder::new()
            .prefix("doc2txt-")
            .suffix(suffix)
            .tempfile_in(&dir)
            .map_err(|source| ExtractError::TempCreate { dir, source })?;

        self.live.fetch_add(1, Ordering::SeqCst);
        debug!("Acquired temp resource {}", file.path().display());

        Ok(TempResource {
            file: Some(file),
            live: Arc::clone(&self.live),
        })
    }

    /// Acquire a resource and fill it with `bytes` in one step.
    pub fn stage(&self, suffix: &str, bytes: &[u8]) -> Result<TempResource, ExtractError> {
        let mut resource = self.acquire(suffix)?;
        resource.write_all(bytes)?;
        Ok(resource)
    }
}

impl Default for TempResourceManager {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A transient on-disk buffer bound to one request.
pub struct TempResource {
    // Only `None` after `release` has consumed the file.
    file: Option<NamedTempFile>,
    live: Arc<AtomicUsize>,
}

impl TempResource {
    pub fn path(&self) -> &Path {
        match &self.file {
            Some(f) => f.path(),
            None => Path::new(""),
        }
    }

    /// Replace the contents with `bytes` and flush them to disk.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), ExtractError> {
        let path = self.path().to_path_buf();
        let io_err = |source| ExtractError::TempIo {
            path: path.clone(),
            source,
        };
        let file = self.file_mut()?.as_file_mut();
        file.set_len(0).map_err(io_err)?;
        file.seek(SeekFrom::Start(0)).map_err(io_err)?;
        file.write_all(bytes).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        Ok(())
    }

    /// Read the whole file back.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>, ExtractError> {
        let path = self.path().to_path_buf();
        let io_err = |source| ExtractError::TempIo {
            path: path.clone(),
            source,
        };
        let file = self.file_mut()?.as_file_mut();
        file.seek(SeekFrom::Start(0)).map_err(io_err)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(io_err)?;
        Ok(buf)
    }

    /// Delete the file now, reporting any error. Dropping does the same
    /// silently.
    pub fn release(mut self) -> Result<(), ExtractError> {
        match self.file.take() {
            Some(file) => {
                let path = file.path().to_path_buf();
                self.live.fetch_sub(1, Ordering::SeqCst);
                file.close()
                    .map_err(|source| ExtractError::TempIo { path, source })
            }
            None => Ok(()),
        }
    }

    fn file_mut(&mut self) -> Result<&mut NamedTempFile, ExtractError> {
        self.file
            .as_mut()
            .ok_or_else(|| ExtractError::Internal("temp resource used after release".into()))
    }
}

impl Drop for TempResource {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            self.live.fetch_sub(1, Ordering::SeqCst);
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                warn!("Failed to remove temp resource {}: {}", path.display(), e);
            }
        }
    }
}

impl std::fmt::Debug for TempResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempResource")
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_write_read_release() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TempResourceManager::new(Some(dir.path().to_path_buf()));

        let mut res = manager.stage(".pdf", b"%PDF-1.7").unwrap();
        let path = res.path().to_path_buf();
        assert!(path.exists());
        assert!(path.starts_with(dir.path()));
        assert!(path.to_string_lossy().ends_with(".pdf"));
        assert_eq!(manager.live(), 1);

        assert_eq!(res.read_to_vec().unwrap(), b"%PDF-1.7");

        res.release().unwrap();
        assert!(!path.exists());
        assert_eq!(manager.live(), 0);
    }

    #[test]
    fn drop_removes_file() {
        let manager = TempResourceManager::default();
        let path = {
            let res = manager.acquire(".png").unwrap();
            res.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(manager.live(), 0);
    }

    #[test]
    fn rewrite_truncates() {
        let manager = TempResourceManager::default();
        let mut res = manager.stage(".txt", b"longer content").unwrap();
        res.write_all(b"short").unwrap();
        assert_eq!(res.read_to_vec().unwrap(), b"short");
    }

    #[test]
    fn error_path_still_cleans_up() {
        let manager = TempResourceManager::default();

        fn failing(manager: &TempResourceManager) -> Result<(), ExtractError> {
            let _staged = manager.stage(".pdf", b"garbage")?;
            Err(ExtractError::Internal("boom".into()))
        }

        assert!(failing(&manager).is_err());
        assert_eq!(manager.live(), 0);
    }

    #[test]
    fn missing_directory_is_a_resource_failure() {
        let manager = TempResourceManager::new(Some(PathBuf::from(
            "/definitely/not/a/real/dir/doc2txt",
        )));
        let err = manager.acquire(".pdf").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ResourceAcquisitionFailure);
        assert_eq!(manager.live(), 0);
    }
}
