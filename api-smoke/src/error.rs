use std::fmt::Display;

/// A check that didn't hold, with what it expected and what the response carried instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub check: String,
    pub expected: String,
    pub actual: String,
}

impl Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.check, self.expected, self.actual
        )
    }
}

#[derive(Debug)]
pub enum Error {
    AssertionFailed(AssertionFailure),
    InvalidPostId(String),
    ReqwestError(reqwest::Error),
    JsonError(serde_json::Error),
    ConfigError(Box<figment::Error>),
    CasePanicked,
}

impl Error {
    pub(crate) fn assertion<C, E, A>(check: C, expected: E, actual: A) -> Self
    where
        C: Into<String>,
        E: ToString,
        A: ToString,
    {
        Error::AssertionFailed(AssertionFailure {
            check: check.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AssertionFailed(failure) => write!(f, "Assertion failed: {}", failure),
            Error::InvalidPostId(body) => {
                write!(f, "The response doesn't carry an integer post id: {}", body)
            }
            Error::ReqwestError(e) => write!(f, "reqwest error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::CasePanicked => write!(f, "The test case panicked"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::ReqwestError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonError(e)
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::ConfigError(Box::new(e))
    }
}
