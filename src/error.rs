use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("No config directory available on this platform, pass --config-file")]
    NoConfigDir,

    #[error("Invalid portal url \"{url}\"")]
    InvalidBaseUrl { url: String },

    #[error("Invalid proxy url \"{url}\": {reason}")]
    InvalidProxy { url: String, reason: String },

    #[error("{0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Create config file ({}) failed: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Read config file ({}) failed: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Exception while writing config file ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file ({}) is not valid JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Config file ({}) has wrong format, please try to delete it first", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("Config file ({}) has an invalid value: {source}", .path.display())]
    InvalidValue {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Config timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}

/// Failure of a single portal request
#[derive(Debug, Error)]
pub(crate) enum RequestError {
    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    pub(crate) fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout)
    }
}

impl From<ureq::Error> for RequestError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => RequestError::Timeout,
            ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                RequestError::Timeout
            }
            ureq::Error::StatusCode(code) => RequestError::Status(code),
            other => RequestError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TokenLoginError {
    #[error("session token is empty")]
    Empty,

    #[error("session expired (status {status}, e = {code:?})")]
    Expired { status: u16, code: Option<i64> },

    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, Error)]
pub(crate) enum LoginError {
    #[error("username not specified")]
    MissingUsername,

    #[error("password not specified")]
    MissingPassword,

    #[error("Login failed, wrong username or password")]
    InvalidCredentials,

    #[error("Login failed, e = {code}, m = {message}")]
    Server { code: i64, message: String },

    #[error("Login failed: {0}")]
    Request(#[from] RequestError),

    #[error("{0}")]
    Persist(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub(crate) enum ReportError {
    #[error("Not in report time")]
    NotInWindow,

    #[error("Report for [{date}] already done")]
    AlreadyReported { date: String },

    #[error("Report for [{date}] failed! e = {code}, m = {message}")]
    Rejected {
        date: String,
        code: i64,
        message: String,
    },

    #[error("Report index returned no status, e = {code}, m = {message}")]
    MissingStatus { code: i64, message: String },

    #[error("Report failed: {0}")]
    Request(#[from] RequestError),
}

impl ReportError {
    /// Window closed or already filed; nothing went wrong
    pub(crate) fn is_informational(&self) -> bool {
        matches!(
            self,
            ReportError::NotInWindow | ReportError::AlreadyReported { .. }
        )
    }
}
