//! Network/config artifact errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed network document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed network document: {0}")]
    Malformed(String),

    #[error("network document is not valid UTF-8")]
    NotUtf8,
}

pub type NetworkResult<T> = Result<T, NetworkError>;
