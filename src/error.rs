use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YearmapError>;

#[derive(Error, Debug)]
pub enum YearmapError {
    #[error("Error retrieving commit dates from {repo}: {message}")]
    SourceUnavailable { repo: PathBuf, message: String },
    #[error("Could not create output directory {path}: {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not stage {path}: {message}")]
    StagingFailed { path: PathBuf, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Year {year} needs 54 week columns, only 53 are supported")]
    UnsupportedYear { year: i32 },
    #[error("Render error: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
