use crate::error::{CloudError, Result};
use std::time::Duration;
use url::Url;

/// How WebDAV responses are checked for server-side errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDetection {
    /// Non-2xx responses are errors; 2xx bodies are only treated as errors
    /// when they decode to a Sabre error with an exception.
    #[default]
    StatusFirst,
    /// Ignore the status and sniff the body: anything starting with `<`
    /// must decode as an error document, and fails when it doesn't.
    BodySniff,
}

/// Connection settings for a Nextcloud instance.
///
/// Built once per invocation and validated before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// `None` keeps the HTTP client's default timeout.
    pub timeout: Option<Duration>,
    pub error_detection: ErrorDetection,
}

impl ClientConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
            error_detection: ErrorDetection::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_error_detection(mut self, detection: ErrorDetection) -> Self {
        self.error_detection = detection;
        self
    }

    /// Check the settings and return the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        if self.url.is_empty() {
            return Err(CloudError::Configuration("missing url".to_string()));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(CloudError::Configuration("missing credentials".to_string()));
        }

        let parsed = Url::parse(&self.url)
            .map_err(|e| CloudError::Configuration(format!("invalid url: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(CloudError::Configuration(format!(
                "invalid url: {} cannot carry a path",
                self.url
            )));
        }
        Ok(parsed)
    }
}
