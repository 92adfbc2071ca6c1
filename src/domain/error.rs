use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Please provide a video link")]
    EmptyUrl,

    #[error("A download is already in progress, please wait")]
    AlreadyDownloading,
}
