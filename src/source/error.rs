use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error - check internet connection")]
    Connectivity,
    #[error("Request error: {0}")]
    Request(String),
    #[error("Error: Could not get data (Status code: {0})")]
    Status(u16),
    #[error("Data format error - missing field: {0}")]
    MissingField(&'static str),
    #[error("Data format error - invalid field: {0}")]
    InvalidField(&'static str),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
                    FetchError::Connectivity
                }
                _ => FetchError::Request(transport.to_string()),
            },
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Request(format!("malformed response: {}", err))
    }
}
