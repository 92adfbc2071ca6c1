pub mod models;
pub mod ytdlp;

use std::path::PathBuf;

use thiserror::Error;

pub use models::{FetchMetadata, FetchProgress};
pub use ytdlp::YtDlpEngine;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("yt-dlp was not found. Install it and make sure it is on PATH")]
    EngineMissing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Engine(String),

    #[error("the media engine returned no metadata")]
    NoMetadata,
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Progress callback handed to the engine; it may be invoked from whichever
/// thread happens to observe a tick.
pub type ProgressSink<'a> = &'a (dyn Fn(FetchProgress) + Send + Sync);

/// The external media-fetch collaborator: retrieves a remote resource,
/// remuxes it into mp4 and reports progress while doing so.
pub trait FetchEngine {
    /// Run the whole fetch. Blocks until the engine is done; `on_progress`
    /// fires for every tick the engine emits along the way.
    fn extract_and_download(
        &self,
        url: &str,
        output_template: &str,
        on_progress: ProgressSink<'_>,
    ) -> Result<FetchMetadata>;

    /// Expand `output_template` with the metadata the engine returned.
    /// Pure computation, no filesystem access.
    fn expected_filename(&self, metadata: &FetchMetadata, output_template: &str) -> PathBuf;
}
