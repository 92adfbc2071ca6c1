use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use crate::domain::{DownloadRequest, Event};
use crate::fetcher::{FetchEngine, FetchProgress, Result};
use crate::utils::human_size;

/// Template the engine resolves from the remote resource's own metadata
/// when the user did not pick a file name.
const TITLE_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Wraps the media-fetch engine: translates its progress ticks into events
/// and resolves the final output path once the engine is done.
pub struct DownloadEngine<F> {
    fetcher: F,
}

impl<F: FetchEngine> DownloadEngine<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Run one download to completion, emitting events along the way.
    /// Returns the path of the produced file.
    pub fn download(&self, req: &DownloadRequest, events: &Sender<Event>) -> Result<PathBuf> {
        fs::create_dir_all(&req.outdir)?;

        let _ = events.send(Event::Status("Preparing…".to_string()));

        let template = match &req.output_name {
            Some(name) => req.outdir.join(name),
            None => req.outdir.join(TITLE_TEMPLATE),
        };
        let template = template.to_string_lossy().into_owned();

        let sink = |progress: FetchProgress| match progress {
            FetchProgress::Downloading {
                percent,
                downloaded_bytes,
                total_bytes,
            } => {
                // An unreadable percent is a dropped tick, not an error: the
                // engine's payload shape is not guaranteed tick to tick.
                if let Some(value) = parse_percent(percent.as_deref()) {
                    let _ = events.send(Event::Progress(value));
                }
                let mut line = human_size(downloaded_bytes.unwrap_or(0));
                if let Some(total) = total_bytes.filter(|t| *t > 0) {
                    line = format!("{} / {}", line, human_size(total));
                }
                let _ = events.send(Event::Log(line));
            }
            FetchProgress::Finished => {
                let _ = events.send(Event::Progress(100));
                let _ = events.send(Event::Log("Post-processing (mp4)…".to_string()));
            }
            FetchProgress::Other => {}
        };

        let metadata = self
            .fetcher
            .extract_and_download(&req.url, &template, &sink)?;

        let resolved = metadata
            .filepath
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| metadata.filename.clone())
            .unwrap_or_else(|| self.fetcher.expected_filename(&metadata, &template));

        // The remux step may have swapped the container without the
        // metadata reflecting it; the filesystem is authoritative here,
        // the metadata only advisory.
        let mp4 = resolved.with_extension("mp4");
        if mp4.exists() {
            Ok(mp4)
        } else {
            Ok(resolved)
        }
    }
}

/// Background worker body: one download, then exactly one terminal event.
pub fn run_download<F: FetchEngine>(fetcher: F, req: DownloadRequest, events: Sender<Event>) {
    let engine = DownloadEngine::new(fetcher);
    match engine.download(&req, &events) {
        Ok(path) => {
            let _ = events.send(Event::Done(path));
        }
        Err(e) => {
            let _ = events.send(Event::Error(e.to_string()));
        }
    }
}

/// Run the worker on a dedicated thread. The thread is detached and owns
/// the sending half of the channel for its whole lifetime.
pub fn spawn_download<F>(fetcher: F, req: DownloadRequest, events: Sender<Event>)
where
    F: FetchEngine + Send + 'static,
{
    thread::spawn(move || run_download(fetcher, req, events));
}

/// "42.3%" → 42. Truncates toward zero, clamps into 0..=100.
fn parse_percent(percent: Option<&str>) -> Option<u8> {
    let raw = percent?.trim().trim_end_matches('%').trim();
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc().clamp(0.0, 100.0) as u8)
}
