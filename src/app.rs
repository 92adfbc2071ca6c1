use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use iced::{Subscription, Task};

use crate::application::download_engine::spawn_download;
use crate::application::request::build_request;
use crate::domain::{AppError, Event};
use crate::fetcher::YtDlpEngine;
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils::open_in_file_manager;

/// How often pending worker events are drained into the view.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DownloadApp {
    view: DownloadView,
    /// Receiving half of the current download's event channel. The sending
    /// half lives on the worker thread; no other code holds either half.
    events: Option<Receiver<Event>>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        Self {
            view: DownloadView::default(),
            events: None,
        }
    }

    /// Guarded start: at most one download may be in flight. A rejected
    /// start leaves the running download's transcript and progress alone.
    fn try_start(&mut self) {
        if self.view.is_downloading {
            self.view.status_message = AppError::AlreadyDownloading.to_string();
            return;
        }

        let req = match build_request(&self.view.url, &self.view.outdir, &self.view.file_name) {
            Ok(req) => req,
            Err(e) => {
                self.view.status_message = e.to_string();
                return;
            }
        };
        let fetcher = match YtDlpEngine::new() {
            Ok(fetcher) => fetcher,
            Err(e) => {
                self.view.status_message = e.to_string();
                return;
            }
        };

        self.view.progress = 0;
        self.view.transcript.clear();
        self.view.is_downloading = true;

        let (tx, rx) = mpsc::channel();
        self.events = Some(rx);
        spawn_download(fetcher, req, tx);
    }

    /// Drain everything the worker queued since the last tick. Never
    /// blocks; only consumes what is already there.
    fn drain_events(&mut self) {
        let Some(rx) = self.events.as_ref() else {
            return;
        };
        while let Ok(event) = rx.try_recv() {
            self.view.apply(event);
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    Tick,
    OutdirPicked(Option<PathBuf>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => {
                    app.try_start();
                }
                DownloadMessage::BrowsePressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::OutdirPicked,
                    );
                }
                DownloadMessage::OpenFolderPressed => {
                    let outdir = app.view.outdir.trim();
                    let path = PathBuf::from(if outdir.is_empty() { "." } else { outdir });
                    let _ = std::fs::create_dir_all(&path);
                    open_in_file_manager(&path);
                }
                _ => {}
            }
        }
        Message::Tick => {
            app.drain_events();
        }
        Message::OutdirPicked(Some(path)) => {
            app.view.outdir = path.display().to_string();
        }
        Message::OutdirPicked(None) => {
            // User cancelled the dialog.
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

pub fn subscription(_app: &DownloadApp) -> Subscription<Message> {
    iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
}
