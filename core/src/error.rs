use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to watch directory: {0}")]
    Watch(#[from] notify::Error),

    #[error("vocabulary is frozen, {documents} documents already registered")]
    VocabularyFrozen { documents: usize },

    #[error("vocabulary is empty, register terms before files")]
    EmptyVocabulary,
}
