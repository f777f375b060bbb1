//! Configuration for the extraction pipeline and the HTTP service.
//!
//! [`ExtractionConfig`] is built through [`ExtractionConfigBuilder`] so the
//! CLI and library callers only set the knobs they care about.
//! [`ServerConfig`] covers the listening socket and upload limit.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pipeline configuration.
///
/// # Example
/// ```rust
/// use doc2txt::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .engine_workers(4)
///     .page_concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.engine_workers, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Pages of one PDF allowed between rendering and recognition at once.
    /// Default: 4.
    ///
    /// Bounds per-request memory: rendered bitmaps wait in a channel of this
    /// size, and no more than this many recognitions are outstanding.
    pub page_concurrency: usize,

    /// Concurrent rasterisation jobs across the whole process. Default: 1.
    ///
    /// pdfium serialises access internally, so more than one rarely helps.
    pub render_workers: usize,

    /// Concurrent OCR / decode / DOCX jobs across the whole process.
    /// Default: available parallelism.
    pub engine_workers: usize,

    /// Directory for staged uploads and rasters. Default: OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Path to libpdfium (file or containing directory). Default: the
    /// current working directory, then the system library path.
    pub pdfium_library: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            page_concurrency: 4,
            render_workers: 1,
            engine_workers: default_parallelism(),
            temp_dir: None,
            pdfium_library: None,
        }
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}

impl ExtractionConfig {
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn page_concurrency(mut self, n: usize) -> Self {
        self.config.page_concurrency = n;
        self
    }

    pub fn render_workers(mut self, n: usize) -> Self {
        self.config.render_workers = n;
        self
    }

    pub fn engine_workers(mut self, n: usize) -> Self {
        self.config.engine_workers = n;
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.page_concurrency == 0 {
            return Err(ExtractError::InvalidConfig(
                "page concurrency must be ≥ 1".into(),
            ));
        }
        if c.render_workers == 0 || c.engine_workers == 0 {
            return Err(ExtractError::InvalidConfig(format!(
                "worker counts must be ≥ 1 (render={}, engine={})",
                c.render_workers, c.engine_workers
            )));
        }
        if let Some(ref dir) = c.temp_dir {
            if !dir.is_dir() {
                return Err(ExtractError::InvalidConfig(format!(
                    "temp dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ExtractionConfig::builder().build().unwrap();
        assert_eq!(config.page_concurrency, 4);
        assert_eq!(config.render_workers, 1);
        assert!(config.engine_workers >= 1);
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let err = ExtractionConfig::builder()
            .page_concurrency(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(ExtractionConfig::builder().engine_workers(0).build().is_err());
        assert!(ExtractionConfig::builder().render_workers(0).build().is_err());
    }

    #[test]
    fn temp_dir_must_exist() {
        let err = ExtractionConfig::builder()
            .temp_dir("/definitely/not/here")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));

        let dir = tempfile::tempdir().unwrap();
        let config = ExtractionConfig::builder()
            .temp_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(config.temp_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn server_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(ServerConfig::default().max_upload_bytes, 52_428_800);
    }
}
