//! Filesystem watcher for the previewed document.
//!
//! Watches the document's parent directory rather than the file itself, so
//! editors that save by writing a temporary file and renaming it over the
//! document keep producing events.

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use smol::channel::Sender;
use std::path::{Path, PathBuf};

/// Classification of a document filesystem event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// The document was written, created or renamed into place
    Modified,
    /// The document no longer exists at its path
    Removed,
}

/// Start watching `file`. Sends events to `sender`.
///
/// Returns the watcher handle which must be kept alive for the duration of
/// monitoring. `file` should be canonical since events carry absolute paths.
pub fn start_watching(
    file: &Path,
    sender: Sender<FileChange>,
) -> notify::Result<RecommendedWatcher> {
    let file = file.to_path_buf();
    let dir = file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let target = file.clone();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("watch error: {err}");
                return;
            },
        };
        if let Some(change) = classify_event(&event, &target) {
            let _ = sender.try_send(change);
        }
    })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::debug!(file = %file.display(), dir = %dir.display(), "watching document");

    Ok(watcher)
}

fn classify_event(event: &notify::Event, file: &Path) -> Option<FileChange> {
    if !event.paths.iter().any(|path| path == file) {
        return None;
    }
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(FileChange::Modified),
        EventKind::Remove(_) => Some(FileChange::Removed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
