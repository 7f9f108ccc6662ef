use thiserror::Error;

/// Errors raised by the document, history and serialization layers.
///
/// Lookups of unknown ids never go through this type (those paths return
/// `bool` / `Option`); it carries the blocking conditions that callers are
/// expected to surface to the user.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("floor {floor_id} still holds {element_count} element(s) and cannot be removed")]
    FloorNotEmpty {
        floor_id: String,
        element_count: usize,
    },
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
    #[error("document is missing the `{0}` section")]
    MissingSection(&'static str),
    #[error("unsupported file extension for {0}: expected .json")]
    UnsupportedExtension(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
