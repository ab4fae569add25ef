//! Directory discovery and incremental TF-IDF scoring against a fixed
//! vocabulary.
//!
//! [`DirectoryMonitor`] finds text files that are ready to read, and
//! [`TfIdfIndex`] registers them and ranks them against the vocabulary.

pub mod discovery;
pub mod error;
pub mod index;
pub mod probe;
pub mod score;
pub mod tokenizer;
pub mod watch;

pub use discovery::DirectoryMonitor;
pub use error::{Error, Result};
pub use index::*;
