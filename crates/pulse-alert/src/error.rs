use std::path::PathBuf;
use thiserror::Error;

/// 冷却状态存储错误
#[derive(Error, Debug)]
pub enum StateError {
    #[error("I/O error on state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt state file {path}: {content:?}")]
    Corrupt { path: PathBuf, content: String },
}
