use iced::{
    widget::{button, column, progress_bar, row, scrollable, text, text_input, Space},
    Element, Length,
};

use crate::domain::Event;

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub outdir: String,
    pub file_name: String,
    pub status_message: String,
    pub progress: u8,
    pub transcript: Vec<String>,
    pub is_downloading: bool,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url: String::new(),
            outdir: "downloads".to_string(),
            file_name: String::new(),
            status_message: "Paste a video link to download".to_string(),
            progress: 0,
            transcript: Vec::new(),
            is_downloading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    OutdirChanged(String),
    FileNameChanged(String),
    DownloadPressed,
    BrowsePressed,
    OpenFolderPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::OutdirChanged(outdir) => {
                self.outdir = outdir;
            }
            DownloadMessage::FileNameChanged(name) => {
                self.file_name = name;
            }
            DownloadMessage::DownloadPressed
            | DownloadMessage::BrowsePressed
            | DownloadMessage::OpenFolderPressed => {
                // Handled by the app.
            }
        }
    }

    /// Fold one consumed worker event into the view state.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Status(status) => {
                self.transcript.push(status.clone());
                self.status_message = status;
            }
            Event::Progress(value) => {
                self.progress = value.min(100);
            }
            Event::Log(line) => {
                self.transcript.push(line);
            }
            Event::Done(path) => {
                self.progress = 100;
                let line = format!("Saved: {}", path.display());
                self.transcript.push(line.clone());
                self.status_message = line;
                self.is_downloading = false;
            }
            Event::Error(message) => {
                let line = format!("Download failed: {}", message);
                self.transcript.push(line.clone());
                self.status_message = line;
                self.is_downloading = false;
            }
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        column![
            text("Simple Video Downloader").size(32),
            Space::new().height(Length::Fixed(10.0)),
            text("Video link:").size(16),
            text_input("https://...", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            text("Save to folder:").size(16),
            row![
                text_input("downloads", &self.outdir)
                    .on_input(DownloadMessage::OutdirChanged)
                    .padding(10),
                button("Browse...")
                    .on_press(DownloadMessage::BrowsePressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            text("File name (optional, extension is always .mp4):").size(16),
            text_input("Leave empty to use the video title", &self.file_name)
                .on_input(DownloadMessage::FileNameChanged)
                .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            progress_bar(0.0..=100.0, f32::from(self.progress)),
            text(&self.status_message).size(14),
            scrollable(text(self.transcript.join("\n")).size(13))
                .height(Length::Fill)
                .width(Length::Fill),
            row![
                button("Download")
                    .on_press(DownloadMessage::DownloadPressed)
                    .padding([10, 20]),
                button("Open folder")
                    .on_press(DownloadMessage::OpenFolderPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apply_status_updates_line_and_transcript() {
        let mut view = DownloadView::default();
        view.apply(Event::Status("Preparing…".to_string()));
        assert_eq!(view.status_message, "Preparing…");
        assert_eq!(view.transcript, vec!["Preparing…".to_string()]);
    }

    #[test]
    fn test_apply_progress_stores_clamped() {
        let mut view = DownloadView::default();
        view.apply(Event::Progress(42));
        assert_eq!(view.progress, 42);
        view.apply(Event::Progress(200));
        assert_eq!(view.progress, 100);
    }

    #[test]
    fn test_apply_done_finishes_the_run() {
        let mut view = DownloadView {
            is_downloading: true,
            progress: 80,
            ..Default::default()
        };
        view.apply(Event::Done(PathBuf::from("downloads/clip.mp4")));
        assert!(!view.is_downloading);
        assert_eq!(view.progress, 100);
        assert_eq!(view.status_message, "Saved: downloads/clip.mp4");
        assert_eq!(view.transcript, vec!["Saved: downloads/clip.mp4".to_string()]);
    }

    #[test]
    fn test_apply_error_finishes_the_run() {
        let mut view = DownloadView {
            is_downloading: true,
            ..Default::default()
        };
        view.apply(Event::Error("no formats found".to_string()));
        assert!(!view.is_downloading);
        assert_eq!(view.status_message, "Download failed: no formats found");
    }

    #[test]
    fn test_apply_log_only_appends() {
        let mut view = DownloadView::default();
        let status_before = view.status_message.clone();
        view.apply(Event::Log("1 MB / 3 MB".to_string()));
        assert_eq!(view.transcript, vec!["1 MB / 3 MB".to_string()]);
        assert_eq!(view.status_message, status_before);
    }
}
