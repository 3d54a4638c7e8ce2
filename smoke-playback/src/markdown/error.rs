use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    IoError(io::Error),
    InvalidMarkdownFormat,
    InvalidInteractionNumber,
    InvalidStatusCode,
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::InvalidMarkdownFormat => {
                write!(f, "The markdown doesn't contain any recorded interaction")
            }
            Error::InvalidInteractionNumber => write!(f, "Invalid interaction number"),
            Error::InvalidStatusCode => write!(f, "Invalid status code"),
        }
    }
}
