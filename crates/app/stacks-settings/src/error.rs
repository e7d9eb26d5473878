pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("failed to parse settings")]
    Parse(#[from] serde_json::Error),

    #[error("failed to parse settings document")]
    Document(#[from] serde_json_lenient::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
