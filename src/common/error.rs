/// Errors surfaced to the views from validation and from the backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Image is too large ({size} bytes, limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
