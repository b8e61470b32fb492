use crate::texture::DecodeError;
use std::fmt::{Debug, Display, Formatter};
use std::{error, io};

pub enum Error {
    IO(io::Error),
    InvalidMagic,
    BrokenFile,
    UnexpectedData(String),
    MissingSection(&'static str),
    Decode(DecodeError),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io: {e}"),
            Error::InvalidMagic => write!(f, "invalid magic"),
            Error::BrokenFile => write!(f, "broken file"),
            Error::UnexpectedData(e) => write!(f, "unexpected data: {e}"),
            Error::MissingSection(e) => write!(f, "missing section: {e}"),
            Error::Decode(e) => write!(f, "decode: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IO(e) => Some(e),
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::IO(value)
    }
}

impl From<DecodeError> for Error {
    fn from(value: DecodeError) -> Self {
        Error::Decode(value)
    }
}
