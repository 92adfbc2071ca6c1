use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::utils::sanitize_filename;

use super::models::{FetchMetadata, FetchProgress};
use super::{FetchEngine, FetchError, ProgressSink, Result};

const PROGRESS_PREFIX: &str = "DL_PROGRESS|";
const INFO_PREFIX: &str = "DL_INFO|";

// Marker prefixes let us tell our own template output apart from whatever
// else yt-dlp prints on the same streams.
const PROGRESS_TEMPLATE: &str = "download:DL_PROGRESS|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._percent_str)s";
const INFO_TEMPLATE: &str = "after_move:DL_INFO|%(.{title,ext,_filename,filepath})j";

/// Media-fetch engine backed by the `yt-dlp` binary.
pub struct YtDlpEngine {
    binary: PathBuf,
}

impl YtDlpEngine {
    /// Locate `yt-dlp` on PATH.
    pub fn new() -> Result<Self> {
        let binary = which::which("yt-dlp").map_err(|_| FetchError::EngineMissing)?;
        Ok(Self { binary })
    }

    /// Use an explicit binary instead of searching PATH.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl FetchEngine for YtDlpEngine {
    fn extract_and_download(
        &self,
        url: &str,
        output_template: &str,
        on_progress: ProgressSink<'_>,
    ) -> Result<FetchMetadata> {
        log::debug!("spawning {} for {}", self.binary.display(), url);

        let mut child = Command::new(&self.binary)
            .arg("--no-playlist")
            .arg("--newline")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--progress")
            .arg("--progress-template")
            .arg(PROGRESS_TEMPLATE)
            .arg("--print")
            .arg(INFO_TEMPLATE)
            .arg("--merge-output-format")
            .arg("mp4")
            .arg("--remux-video")
            .arg("mp4")
            .arg("-o")
            .arg(output_template)
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FetchError::Engine("failed to capture yt-dlp stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| FetchError::Engine("failed to capture yt-dlp stderr".to_string()))?;

        let mut metadata: Option<FetchMetadata> = None;
        let mut stderr_tail: Option<String> = None;

        // Depending on the build, yt-dlp routes progress to stdout or to
        // stderr, so both streams go through the same line parser. The
        // stderr reader also keeps the last non-progress line around as the
        // failure message.
        thread::scope(|scope| {
            let stderr_reader = scope.spawn(|| {
                let mut tail = None;
                for line in BufReader::new(stderr).lines() {
                    let Ok(line) = line else { break };
                    if let Some(progress) = parse_progress_line(&line) {
                        on_progress(progress);
                    } else if !line.trim().is_empty() {
                        tail = Some(line.trim().to_string());
                    }
                }
                tail
            });

            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if let Some(progress) = parse_progress_line(&line) {
                    on_progress(progress);
                } else if let Some(json) = line.trim().strip_prefix(INFO_PREFIX) {
                    match serde_json::from_str(json) {
                        Ok(parsed) => metadata = Some(parsed),
                        Err(e) => log::warn!("unreadable metadata line from yt-dlp: {}", e),
                    }
                }
            }

            stderr_tail = stderr_reader.join().unwrap_or(None);
        });

        let status = child.wait()?;
        if !status.success() {
            let message =
                stderr_tail.unwrap_or_else(|| format!("yt-dlp exited with {}", status));
            log::warn!("yt-dlp failed: {}", message);
            return Err(FetchError::Engine(message));
        }

        metadata.ok_or(FetchError::NoMetadata)
    }

    fn expected_filename(&self, metadata: &FetchMetadata, output_template: &str) -> PathBuf {
        let title = metadata.title.as_deref().unwrap_or("video");
        let ext = metadata.ext.as_deref().unwrap_or("mp4");
        PathBuf::from(
            output_template
                .replace("%(title)s", &sanitize_filename(title))
                .replace("%(ext)s", ext),
        )
    }
}

/// Parse one `DL_PROGRESS|status|downloaded|total|total_estimate|percent`
/// line. Returns `None` for anything that is not one of our progress lines.
fn parse_progress_line(line: &str) -> Option<FetchProgress> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    let mut fields = rest.split('|');

    let status = fields.next().unwrap_or_default();
    let downloaded = fields.next();
    let total = fields.next();
    let total_estimate = fields.next();
    let percent = fields.next();

    match status {
        "downloading" => Some(FetchProgress::Downloading {
            percent: percent
                .map(str::trim)
                .filter(|p| !p.is_empty() && *p != "NA")
                .map(String::from),
            downloaded_bytes: parse_byte_field(downloaded),
            total_bytes: parse_byte_field(total).or_else(|| parse_byte_field(total_estimate)),
        }),
        "finished" => Some(FetchProgress::Finished),
        _ => Some(FetchProgress::Other),
    }
}

/// Byte counts arrive as integers, floats (estimates) or "NA".
fn parse_byte_field(field: Option<&str>) -> Option<u64> {
    let value: f64 = field?.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_downloading() {
        let line = "DL_PROGRESS|downloading|512|1024|NA|  50.0%";
        match parse_progress_line(line) {
            Some(FetchProgress::Downloading {
                percent,
                downloaded_bytes,
                total_bytes,
            }) => {
                assert_eq!(percent.as_deref(), Some("50.0%"));
                assert_eq!(downloaded_bytes, Some(512));
                assert_eq!(total_bytes, Some(1024));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_progress_total_falls_back_to_estimate() {
        let line = "DL_PROGRESS|downloading|512|NA|2048.7|25.0%";
        match parse_progress_line(line) {
            Some(FetchProgress::Downloading { total_bytes, .. }) => {
                assert_eq!(total_bytes, Some(2048));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_progress_missing_fields_become_none() {
        let line = "DL_PROGRESS|downloading|NA|NA|NA|NA";
        match parse_progress_line(line) {
            Some(FetchProgress::Downloading {
                percent,
                downloaded_bytes,
                total_bytes,
            }) => {
                assert_eq!(percent, None);
                assert_eq!(downloaded_bytes, None);
                assert_eq!(total_bytes, None);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_progress_finished() {
        let line = "DL_PROGRESS|finished|1024|1024|NA|100%";
        assert_eq!(parse_progress_line(line), Some(FetchProgress::Finished));
    }

    #[test]
    fn test_parse_progress_unknown_status() {
        let line = "DL_PROGRESS|processing|NA|NA|NA|NA";
        assert_eq!(parse_progress_line(line), Some(FetchProgress::Other));
    }

    #[test]
    fn test_parse_progress_rejects_foreign_lines() {
        assert_eq!(parse_progress_line("[download]  50.0% of 10MiB"), None);
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn test_metadata_json_field_names() {
        let json = r#"{"title":"Clip","ext":"mkv","_filename":"downloads/Clip.mkv","filepath":"downloads/Clip.mkv"}"#;
        let meta: FetchMetadata = serde_json::from_str(json).expect("valid metadata json");
        assert_eq!(meta.title.as_deref(), Some("Clip"));
        assert_eq!(meta.ext.as_deref(), Some("mkv"));
        assert_eq!(meta.filename, Some(PathBuf::from("downloads/Clip.mkv")));
        assert_eq!(meta.filepath, Some(PathBuf::from("downloads/Clip.mkv")));
    }

    #[test]
    fn test_metadata_json_fields_are_optional() {
        let meta: FetchMetadata = serde_json::from_str("{}").expect("empty metadata json");
        assert!(meta.title.is_none());
        assert!(meta.filepath.is_none());
        assert!(meta.filename.is_none());
    }

    #[test]
    fn test_expected_filename_substitutes_placeholders() {
        let engine = YtDlpEngine::with_binary("yt-dlp");
        let meta = FetchMetadata {
            title: Some("My: Clip".to_string()),
            ext: Some("webm".to_string()),
            ..Default::default()
        };
        assert_eq!(
            engine.expected_filename(&meta, "downloads/%(title)s.%(ext)s"),
            PathBuf::from("downloads/My_ Clip.webm")
        );
    }

    #[test]
    fn test_expected_filename_leaves_fixed_names_alone() {
        let engine = YtDlpEngine::with_binary("yt-dlp");
        assert_eq!(
            engine.expected_filename(&FetchMetadata::default(), "downloads/video.mp4"),
            PathBuf::from("downloads/video.mp4")
        );
    }
}
