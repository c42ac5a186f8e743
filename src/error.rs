use std::path::PathBuf;
use thiserror::Error;

/// Hard failures raised before the analysis engine runs.
///
/// Field-level problems inside events are never reported through this type;
/// they become validation issues on the resulting analysis instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty input")]
    EmptyInput,

    #[error("no events decoded")]
    NoEvents,

    #[error("decode JSON array: {0}")]
    DecodeArray(#[source] serde_json::Error),

    #[error("decode JSON object: {0}")]
    DecodeObject(#[source] serde_json::Error),

    #[error("decode NDJSON line {line}: {source}")]
    DecodeLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is a directory; pass files or globs", .0.display())]
    IsDirectory(PathBuf),

    #[error("glob {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no input files resolved")]
    NoInputFiles,

    #[error("Stream config error: {0}")]
    StreamConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a decode failure with the file it came from
    pub fn parse_at(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Parse {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
