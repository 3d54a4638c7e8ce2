use crate::markdown;
use hyper::http;
use std::{fmt::Display, io, sync};

#[derive(Debug)]
pub enum Error {
    MarkdownParseError(markdown::error::Error),
    IoError(io::Error),
    PoisonedLock,
    InvalidHeaderName,
    InvalidHeaderValue,
    InvalidBody,
    HyperError(hyper::Error),
    HttpError(http::Error),
    UnexpectedRequest(String, String),
    RequestBodyMismatch {
        uri: String,
        expected: String,
        actual: String,
    },
    UnplayedInteractions(Vec<String>),
    ServerThreadPanicked,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MarkdownParseError(e) => write!(f, "Markdown error: {}", e),
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::PoisonedLock => write!(f, "The lock was poisoned"),
            Error::InvalidHeaderName => write!(f, "Invalid header name"),
            Error::InvalidHeaderValue => write!(f, "Invalid header value"),
            Error::InvalidBody => write!(f, "Invalid body"),
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
            Error::UnexpectedRequest(method, uri) => {
                write!(f, "No recorded interaction left for {} {}", method, uri)
            }
            Error::RequestBodyMismatch {
                uri,
                expected,
                actual,
            } => write!(
                f,
                "The request body sent to {} differs from the recording: expected {}, got {}",
                uri, expected, actual
            ),
            Error::UnplayedInteractions(interactions) => write!(
                f,
                "Recorded interactions were never requested: {}",
                interactions.join(", ")
            ),
            Error::ServerThreadPanicked => write!(f, "The playback server thread panicked"),
        }
    }
}

impl From<markdown::error::Error> for Error {
    fn from(e: markdown::error::Error) -> Self {
        Error::MarkdownParseError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
