#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[cfg(feature = "network")]
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// `status_text` is the reason phrase, empty for non-standard codes.
    #[error("HTTP {status}{}", reason_suffix(.status_text))]
    Status { status: u16, status_text: String },

    #[error("invalid response from gateway: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

fn reason_suffix(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(": {text}")
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
