use thiserror::Error;

#[derive(Error, Debug)]
pub enum HibikiError {
    #[error("HTTP error: {0}")]
    HttpError(reqwest::StatusCode),

    /// The fetch was cancelled through [`Locator::abort_fetch`]. Not a
    /// real failure; callers should not log it as one.
    ///
    /// [`Locator::abort_fetch`]: crate::Locator::abort_fetch
    #[error("Fetch aborted")]
    FetchAborted,

    /// The media URL template could not be resolved into a URL. The
    /// whole segment index is rejected, since a template that fails for
    /// one segment will fail for the rest as well.
    #[error("Failed to resolve media url template: {0}")]
    MediaUrlResolution(String),

    #[error("Invalid media range: {0}")]
    InvalidMediaRange(String),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
}

pub type HibikiResult<T> = Result<T, HibikiError>;
