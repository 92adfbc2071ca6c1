use std::path::PathBuf;

/// Parameters of a single download, fixed at start time.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub outdir: PathBuf,
    /// Final file name, if the user picked one. Always sanitized and
    /// ending in `.mp4` by the time a request exists.
    pub output_name: Option<String>,
}

/// Everything the background worker reports back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Status(String),
    /// Percentage in 0..=100.
    Progress(u8),
    Log(String),
    Done(PathBuf),
    Error(String),
}
