use crate::error::{Error, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Directory listing plus a queue of entries that appeared in it.
pub trait DirectoryWatch {
    /// Directory being watched.
    fn root(&self) -> &Path;

    /// Every entry currently in the directory, unsorted.
    fn list_entries(&self) -> io::Result<Vec<PathBuf>>;

    /// Paths created or moved in since the last call, in delivery order.
    /// Never blocks.
    fn poll_created(&mut self) -> Vec<PathBuf>;

    /// Make the watch ready for the next poll. An error means future polls
    /// may stay empty.
    fn rearm(&mut self) -> Result<()>;
}

/// `notify`-backed watch on a single directory (non-recursive).
pub struct NotifyWatch {
    root: PathBuf,
    events: Receiver<notify::Result<Event>>,
    // dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
}

impl NotifyWatch {
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::DirectoryNotFound(root.to_path_buf()));
        }
        // event paths come back absolute, so listings must be too
        let root = root.canonicalize()?;
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        Ok(Self { root, events: rx, _watcher: watcher })
    }
}

impl DirectoryWatch for NotifyWatch {
    fn root(&self) -> &Path { &self.root }

    fn list_entries(&self) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn poll_created(&mut self) -> Vec<PathBuf> {
        let mut created = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(Ok(event)) => created.extend(appeared_paths(event)),
                Ok(Err(err)) => tracing::error!(error = %err, "directory watch error"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!(root = %self.root.display(), "directory watch disconnected");
                    break;
                }
            }
        }
        created
    }

    fn rearm(&mut self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(Error::DirectoryNotFound(self.root.clone()))
        }
    }
}

/// Paths an event brings into the directory: creations and rename targets.
fn appeared_paths(event: Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) => event.paths,
        // `Any` is what backends report when they cannot tell source from
        // target; a vanished source is dropped later by validation
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Any)) => event.paths,
        // paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.into_iter().skip(1).collect(),
        _ => Vec::new(),
    }
}
