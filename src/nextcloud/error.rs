use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Exception: {exception}, Message: {message}")]
    Remote { exception: String, message: String },

    #[error("{operation}: API returned an unsuccessful status code {code} ({message})")]
    Api {
        operation: String,
        code: u64,
        message: String,
    },

    #[error("{verb} {url} returned HTTP {status}")]
    Status {
        verb: String,
        url: String,
        status: u16,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<quick_xml::Error> for CloudError {
    fn from(e: quick_xml::Error) -> Self {
        CloudError::Decode(e.to_string())
    }
}

impl CloudError {
    /// The remote exception name, when the server reported one.
    pub fn exception(&self) -> Option<&str> {
        match self {
            CloudError::Remote { exception, .. } => Some(exception),
            _ => None,
        }
    }

    /// The OCS status code, for Apps/Share endpoint failures.
    pub fn api_code(&self) -> Option<u64> {
        match self {
            CloudError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
