use failchain::{BoxedError, ChainErrorKind};
use failure::Fail;
use std::path::Path;
use std::result::Result as StdResult;

pub type Error = BoxedError<ErrorKind>;
pub type Result<T> = StdResult<T, Error>;

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "Invalid command line arguments.")]
    Arguments,

    #[fail(display = "Nothing to do: pass one of --world, --level or --check.")]
    NoInput,

    #[fail(display = "Failed to read configuration `{}`.", _0)]
    Config(String),

    #[fail(display = "Failed to load `{}`.", _0)]
    Load(String),

    #[fail(display = "Failed to list directory `{}`.", _0)]
    ListDirectory(String),

    #[fail(display = "{} of {} worlds failed to load.", failed, total)]
    CheckFailed { failed: usize, total: usize },
}

impl ChainErrorKind for ErrorKind {
    type Error = Error;
}

impl ErrorKind {
    pub fn config(path: &Path) -> Self {
        ErrorKind::Config(path.display().to_string())
    }

    pub fn load(path: &Path) -> Self {
        ErrorKind::Load(path.display().to_string())
    }

    pub fn list_directory(path: &Path) -> Self {
        ErrorKind::ListDirectory(path.display().to_string())
    }
}

/// Renders an error followed by everything it was caused by, one per line.
pub fn report(error: &Error) -> String {
    let mut message = error.to_string();
    let mut cause = error.cause();
    while let Some(fail) = cause {
        message.push_str("\n    caused by: ");
        message.push_str(&fail.to_string());
        cause = fail.cause();
    }
    message
}

#[cfg(test)]
mod test {
    use super::{report, ErrorKind, Result};
    use failchain::ResultExt;
    use std::fs;
    use std::path::Path;

    fn list(path: &Path) -> Result<usize> {
        Ok(fs::read_dir(path)
            .chain_err(|| ErrorKind::list_directory(path))?
            .count())
    }

    #[test]
    fn report_includes_causes() {
        let path = Path::new("/definitely/not/a/directory");
        let error = list(path).unwrap_err();
        assert_eq!(
            *error.kind(),
            ErrorKind::ListDirectory("/definitely/not/a/directory".to_owned())
        );
        let report = report(&error);
        let mut lines = report.lines();
        assert_eq!(
            lines.next(),
            Some("Failed to list directory `/definitely/not/a/directory`.")
        );
        assert!(lines.next().unwrap().starts_with("    caused by: "));
    }

    #[test]
    fn check_failure_message() {
        let error: super::Error = ErrorKind::CheckFailed {
            failed: 2,
            total: 5,
        }
        .into();
        assert_eq!(report(&error), "2 of 5 worlds failed to load.");
    }
}
