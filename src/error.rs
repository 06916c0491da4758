use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("book error: {0}")]
    Book(#[from] levelbook::BookError),
}
