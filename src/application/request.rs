use std::path::PathBuf;

use crate::domain::{AppError, DownloadRequest};
use crate::utils::force_mp4_name;

const DEFAULT_OUTDIR: &str = "downloads";

/// Validate and normalize raw user input into a request.
pub fn build_request(
    url: &str,
    outdir_text: &str,
    raw_name: &str,
) -> Result<DownloadRequest, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::EmptyUrl);
    }

    let outdir_text = outdir_text.trim();
    let outdir = if outdir_text.is_empty() {
        DEFAULT_OUTDIR
    } else {
        outdir_text
    };

    let raw_name = raw_name.trim();
    let output_name = if raw_name.is_empty() {
        None
    } else {
        Some(force_mp4_name(raw_name))
    };

    Ok(DownloadRequest {
        url: url.to_string(),
        outdir: PathBuf::from(outdir),
        output_name,
    })
}
