use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::post::PostId;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a usable response
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("{}", api_message(.status, .message))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("post {id} not found")]
    NotFound { id: PostId },
    #[error("{0}")]
    Validation(String),
    #[error("invalid post data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid API URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl Error {
    /// Message the server attached to a failed response, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

fn api_message(status: &StatusCode, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => format!("request failed with status {status}"),
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
