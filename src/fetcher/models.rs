use std::path::PathBuf;

use serde::Deserialize;

/// One progress tick from the media engine, as loosely shaped as the engine
/// reports it. Fields the engine did not provide are simply absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchProgress {
    Downloading {
        /// Raw percent string as rendered by the engine, e.g. "42.3%".
        percent: Option<String>,
        downloaded_bytes: Option<u64>,
        /// Exact total when known, otherwise the engine's estimate.
        total_bytes: Option<u64>,
    },
    Finished,
    Other,
}

/// Metadata the engine reports for a completed download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchMetadata {
    pub title: Option<String>,
    pub ext: Option<String>,
    /// Path of the output file after the engine moved it into place.
    pub filepath: Option<PathBuf>,
    /// Output filename as resolved by the engine itself.
    #[serde(rename = "_filename")]
    pub filename: Option<PathBuf>,
}
