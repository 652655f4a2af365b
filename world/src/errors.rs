use failchain::{BoxedError, ChainErrorKind};
use failure::Fail;
use std::io;
use std::path::Path;
use std::result::Result as StdResult;

pub type Error = BoxedError<ErrorKind>;
pub type Result<T> = StdResult<T, Error>;

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "File not found: `{}`.", _0)]
    FileNotFound(String),

    #[fail(display = "I/O error: {}", _0)]
    Io(String),

    #[fail(display = "Unexpected end of input at offset {} reading {}.", offset, reading)]
    TruncatedInput { offset: u64, reading: &'static str },

    #[fail(display = "Corrupt {} count {}.", what, count)]
    CorruptCount { what: &'static str, count: i64 },

    #[fail(
        display = "Sector {} has {} faces, outside [{}, {}].",
        sector, count, min, max
    )]
    CorruptFaceCount {
        sector: usize,
        count: i32,
        min: i32,
        max: i32,
    },

    #[fail(display = "Unknown face type {} at offset {}.", tag, offset)]
    UnknownFaceType { tag: u32, offset: u64 },

    #[fail(display = "Unknown BSP node type {} at offset {}.", tag, offset)]
    UnknownNodeType { tag: u32, offset: u64 },

    #[fail(display = "Vertex index {} out of range (pool size {}).", index, pool)]
    BadVertexIndex { index: i64, pool: usize },

    #[fail(display = "Sector index {} out of range ({} sectors).", index, sectors)]
    BadSectorIndex { index: i64, sectors: usize },

    #[fail(display = "Triangulation failed: {}", _0)]
    Triangulation(String),

    #[fail(display = "Corrupt {} file: {}", what, message)]
    CorruptFile { what: &'static str, message: String },

    #[fail(display = "Invalid configuration: {}", _0)]
    Config(String),
}

impl ChainErrorKind for ErrorKind {
    type Error = Error;
}

impl ErrorKind {
    pub(crate) fn on_file_open<'a>(path: &'a Path) -> impl FnOnce(io::Error) -> Error + 'a {
        move |error: io::Error| {
            let path = path.display().to_string();
            if error.kind() == io::ErrorKind::NotFound {
                Error::from(error.context(ErrorKind::FileNotFound(path)))
            } else {
                Error::from(error.context(ErrorKind::Io(format!("Failed to open `{}`.", path))))
            }
        }
    }

    pub(crate) fn on_read(offset: u64, reading: &'static str) -> impl FnOnce(io::Error) -> Error {
        move |error: io::Error| {
            if error.kind() == io::ErrorKind::UnexpectedEof {
                Error::from(error.context(ErrorKind::TruncatedInput { offset, reading }))
            } else {
                Error::from(error.context(ErrorKind::Io(format!(
                    "Reading {} at offset {} failed.",
                    reading, offset
                ))))
            }
        }
    }

    pub(crate) fn on_seek(offset: i64) -> impl FnOnce(io::Error) -> Error {
        move |error: io::Error| {
            Error::from(error.context(ErrorKind::Io(format!("Seeking to {} failed.", offset))))
        }
    }

    pub(crate) fn corrupt_file<MessageT: Into<String>>(what: &'static str, message: MessageT) -> Self {
        ErrorKind::CorruptFile {
            what,
            message: message.into(),
        }
    }

    pub(crate) fn on_config_parse<ErrorT: Fail>(error: ErrorT) -> Error {
        let message = error.to_string();
        Error::from(error.context(ErrorKind::Config(message)))
    }
}
