use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single remote call. Display is the text surfaced to users.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", status_message(*status, message.as_deref()))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    Decode(String),
}

fn status_message(status: StatusCode, message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("Request failed with status code {}", status.as_u16()),
    }
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Validation(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
pub type SyncResult<T> = Result<T, SyncError>;
