use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt timestamp '{raw}' in {path}")]
    Corrupt { path: PathBuf, raw: String },
}

pub type PersistResult<T> = Result<T, PersistError>;
