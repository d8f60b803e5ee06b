/// Result alias used across the crate.
pub type IdmarkResult<T> = Result<T, IdmarkError>;

/// Every failure the pipeline can surface to the user.
///
/// Each error is terminal for the current attempt; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum IdmarkError {
    /// The declared MIME type is neither `image/*` nor `application/pdf`.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The input exceeds the upload size limit.
    #[error("file too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge {
        /// Size of the rejected input in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        limit: u64,
    },

    /// The raw file could not be read into memory.
    #[error("file read error: {0}")]
    FileRead(String),

    /// Image decoding or page rasterization failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// The drawing surface could not be allocated or drawn.
    #[error("render error: {0}")]
    Render(String),

    /// An operation was invoked in a session state that does not allow it.
    #[error("session error: {0}")]
    Session(String),

    /// Wrapped error from an I/O boundary.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IdmarkError {
    /// Construct [`IdmarkError::UnsupportedFileType`].
    pub fn unsupported(mime: impl Into<String>) -> Self {
        Self::UnsupportedFileType(mime.into())
    }

    /// Construct [`IdmarkError::FileRead`].
    pub fn file_read(msg: impl Into<String>) -> Self {
        Self::FileRead(msg.into())
    }

    /// Construct [`IdmarkError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Construct [`IdmarkError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Construct [`IdmarkError::Session`].
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
