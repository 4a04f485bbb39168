//! Error definitions for the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Auth error: {message}")]
    Auth { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Generation already in progress")]
    Busy,
}

impl Error {
    /// 是否为请求发出后才产生的传输/服务端错误。
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpClient { .. } | Self::ApiError { .. } | Self::Serialization { .. }
        )
    }

    /// 展示给用户的错误文本：携带消息的错误原样返回消息本身。
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. }
            | Self::Auth { message }
            | Self::Input { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
