//! Shared handler state.

use crate::config::ServerConfig;
use crate::extract::ExtractionPipeline;
use std::sync::Arc;

/// State handed to every handler: the process-wide pipeline and the
/// listener settings it was started with.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<ExtractionPipeline>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pipeline: ExtractionPipeline, server: ServerConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            server: Arc::new(server),
        }
    }
}
