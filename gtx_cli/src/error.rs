use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

pub enum Error {
    IO(std::io::Error),
    Gtx(gtx::Error),
    Image(image::ImageError),
    InvalidPath(PathBuf),
    InvalidRaster,
    Failed(usize),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io: {e}"),
            Error::Gtx(e) => write!(f, "gtx: {e}"),
            Error::Image(e) => write!(f, "image: {e}"),
            Error::InvalidPath(p) => write!(f, "invalid path {}", p.display()),
            Error::InvalidRaster => f.write_str("invalid raster"),
            Error::Failed(n) => write!(f, "{n} file(s) failed"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<gtx::Error> for Error {
    fn from(value: gtx::Error) -> Self {
        Error::Gtx(value)
    }
}

impl From<gtx::DecodeError> for Error {
    fn from(value: gtx::DecodeError) -> Self {
        Error::Gtx(value.into())
    }
}

impl From<image::ImageError> for Error {
    fn from(value: image::ImageError) -> Self {
        Error::Image(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IO(value)
    }
}
