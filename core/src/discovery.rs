//! Directory discovery and the "ready text file" validation protocol.
//!
//! A candidate entry is accepted only if
//!
//! 1. it is a regular file that can be exclusively locked and released
//!    right away (a best-effort guard against files still being written), and
//! 2. the content probe classifies it as exactly `text/plain`.
//!
//! Rejected entries are logged and dropped; they never surface as errors.

use crate::error::Result;
use crate::probe::{ContentProbe, ExtensionProbe, TEXT_PLAIN};
use crate::watch::{DirectoryWatch, NotifyWatch};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Why a candidate entry was left out.
#[derive(Debug)]
pub enum Rejection {
    /// Could not be opened or locked; probably still being written.
    NotReady(io::Error),
    /// Not a regular file.
    NotAFile,
    /// Probe reported another type, or none.
    NotText(Option<String>),
}

pub struct DirectoryMonitor {
    watch: Box<dyn DirectoryWatch>,
    probe: Box<dyn ContentProbe>,
}

impl DirectoryMonitor {
    /// Start watching `directory` for newly created entries.
    ///
    /// Fails if the directory does not exist or the watch cannot be set up.
    pub fn configure<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        tracing::debug!(directory = %directory.display(), "configuring directory");
        let watch = NotifyWatch::new(directory).map_err(|err| {
            tracing::error!(directory = %directory.display(), error = %err, "error configuring directory watch");
            err
        })?;
        Ok(Self::with_parts(Box::new(watch), Box::new(ExtensionProbe)))
    }

    /// Assemble a monitor from any watch backend and content probe.
    pub fn with_parts(watch: Box<dyn DirectoryWatch>, probe: Box<dyn ContentProbe>) -> Self {
        Self { watch, probe }
    }

    pub fn directory(&self) -> &Path { self.watch.root() }

    /// Every valid text file currently in the directory, sorted by path.
    pub fn list_current_valid_entries(&self) -> Vec<PathBuf> {
        tracing::trace!(directory = %self.directory().display(), "checking current directory status");
        let mut entries = match self.watch.list_entries() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(directory = %self.directory().display(), error = %err, "error listing directory");
                return Vec::new();
            }
        };
        entries.sort();
        entries.into_iter().filter(|p| self.accept(p)).collect()
    }

    /// Valid text files created since the previous poll, in event order.
    pub fn list_new_valid_entries(&mut self) -> Vec<PathBuf> {
        let created = self.watch.poll_created();
        if created.is_empty() {
            tracing::trace!("no new files found");
        }

        let mut seen = HashSet::new();
        let accepted = created
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .filter(|p| self.accept(p))
            .collect();

        if let Err(err) = self.watch.rearm() {
            tracing::error!(directory = %self.directory().display(), error = %err, "directory is no longer accessible");
        }
        accepted
    }

    /// Run the validation protocol on a single entry.
    pub fn validate(&self, path: &Path) -> std::result::Result<(), Rejection> {
        check_not_busy(path)?;
        match self.probe.probe(path) {
            Some(mime) if mime == TEXT_PLAIN => Ok(()),
            other => Err(Rejection::NotText(other)),
        }
    }

    fn accept(&self, path: &Path) -> bool {
        match self.validate(path) {
            Ok(()) => true,
            Err(Rejection::NotReady(err)) => {
                tracing::warn!(path = %path.display(), error = %err, "file not ready, skipping");
                false
            }
            Err(Rejection::NotAFile) => {
                tracing::warn!(path = %path.display(), "not a regular file, skipping");
                false
            }
            Err(Rejection::NotText(mime)) => {
                tracing::warn!(path = %path.display(), mime = mime.as_deref().unwrap_or("unknown"), "file is not a plain text file");
                false
            }
        }
    }
}

/// Take and drop an exclusive lock on the whole file.
fn check_not_busy(path: &Path) -> std::result::Result<(), Rejection> {
    let file = File::open(path).map_err(Rejection::NotReady)?;
    let meta = file.metadata().map_err(Rejection::NotReady)?;
    if !meta.is_file() {
        return Err(Rejection::NotAFile);
    }
    FileExt::try_lock_exclusive(&file).map_err(Rejection::NotReady)?;
    FileExt::unlock(&file).map_err(Rejection::NotReady)?;
    Ok(())
}
