use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("catalog request failed: {0}")]
    CatalogFetch(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}")]
    CatalogStatus { status: u16 },

    #[error("catalog payload decode failed: {0}")]
    CatalogDecode(#[from] serde_json::Error),

    #[error("book not found: {0}")]
    BookNotFound(String),

    #[error("invalid catalog URL: {0}")]
    InvalidCatalogUrl(#[from] url::ParseError),

    #[error("invalid value for {name}: {value}")]
    InvalidConfig { name: &'static str, value: String },

    #[error("shelf lock poisoned")]
    LockPoisoned,
}
