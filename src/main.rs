mod app;
mod application;
mod domain;
mod fetcher;
mod ui;
mod utils;

use iced::window;

fn main() -> iced::Result {
    iced::application(app::DownloadApp::default, app::update, app::view)
        .subscription(app::subscription)
        .title("Simple Video Downloader")
        .window(window::Settings {
            size: iced::Size::new(760.0, 460.0),
            ..Default::default()
        })
        .run()
}
