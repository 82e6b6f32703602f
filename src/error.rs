//! Board Errors
//!
//! Failures the board surfaces to the entry point. Silent no-op paths
//! (no drag support, no columns, card without id) are not errors.

use thiserror::Error;
use wasm_bindgen::JsValue;

pub type BoardResult<T> = Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    #[error("invalid board config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid init options: {0}")]
    InitOptions(#[from] serde_wasm_bindgen::Error),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for BoardError {
    fn from(value: JsValue) -> Self {
        BoardError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err: BoardError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid board config:"));
    }

    #[test]
    fn test_dom_error_message() {
        let err = BoardError::Dom("form.submit is not a function".to_string());
        assert_eq!(err.to_string(), "DOM operation failed: form.submit is not a function");
    }
}
