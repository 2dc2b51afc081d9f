//! `headline watch`: live preview driven by filesystem events.
//!
//! Every change notification goes through the [`UpdateScheduler`], so a burst
//! of writes from an editor save produces one re-render.

use crate::{
    cli::TargetArgs,
    settings,
    surface::FileSurface,
    watcher::{self, FileChange},
};
use anyhow::{Context, Result};
use headline::{Config, UpdateScheduler};
use smol::LocalExecutor;
use std::{
    cell::{Ref, RefCell},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

/// A watched document and the scheduler publishing its previews.
pub struct WatchSession<W: Write + 'static> {
    surface: Rc<RefCell<FileSurface<W>>>,
    scheduler: UpdateScheduler<FileSurface<W>>,
    overrides: TargetArgs,
}

impl<W: Write + 'static> WatchSession<W> {
    pub fn new(
        surface: FileSurface<W>,
        target: &TargetArgs,
        config: Config,
        executor: Rc<LocalExecutor<'static>>,
    ) -> Self {
        let surface = Rc::new(RefCell::new(
            surface.with_visible_lines(target.lines.clone()),
        ));
        let scheduler = UpdateScheduler::new(&surface, target.apply(config), executor);
        Self {
            surface,
            scheduler,
            overrides: target.clone(),
        }
    }

    /// Schedule the initial render.
    pub fn start(&self) {
        self.scheduler.document_changed();
    }

    pub fn document_event(&self, change: FileChange) {
        match change {
            FileChange::Modified => {
                let reloaded = self.surface.borrow_mut().reload();
                match reloaded {
                    Ok(true) => self.scheduler.document_changed(),
                    Ok(false) => tracing::trace!("document unchanged"),
                    Err(err) => tracing::warn!("{err:#}"),
                }
            },
            FileChange::Removed => {
                let surface = self.surface.borrow();
                tracing::warn!(
                    path = %surface.path().display(),
                    "document removed, keeping last preview"
                );
            },
        }
    }

    /// Adopt freshly loaded settings, keeping this run's overrides on top.
    pub fn settings_changed(&self, persisted: Config) {
        let config = self.overrides.apply(persisted);
        if config != self.scheduler.config() {
            self.scheduler.set_config(config);
        }
    }

    pub fn surface(&self) -> Ref<'_, FileSurface<W>> {
        self.surface.borrow()
    }

    pub fn scheduler(&self) -> &UpdateScheduler<FileSurface<W>> {
        &self.scheduler
    }
}

impl<W: Write + 'static> Drop for WatchSession<W> {
    fn drop(&mut self) {
        self.scheduler.dispose();
    }
}

enum Trigger {
    Document(FileChange),
    Settings,
}

pub fn handle(target: &TargetArgs, settings_path: Option<&Path>, config: Config) -> Result<()> {
    let file = fs::canonicalize(&target.file)
        .with_context(|| format!("Failed to resolve {}", target.file.display()))?;
    let surface = FileSurface::open(&file, io::stdout())?;

    let executor = Rc::new(LocalExecutor::new());
    let session = WatchSession::new(surface, target, config, executor.clone());

    let (document_tx, document_rx) = smol::channel::unbounded();
    let _document_watcher =
        watcher::start_watching(&file, document_tx).context("Failed to watch document")?;

    let (settings_tx, settings_rx) = smol::channel::unbounded();
    let settings_path = settings_path.map(canonical_settings_path);
    let _settings_watcher = settings_path.as_deref().and_then(|path| {
        watcher::start_watching(path, settings_tx)
            .map_err(|err| tracing::warn!(path = %path.display(), "not watching settings: {err}"))
            .ok()
    });

    tracing::info!(file = %file.display(), "watching");
    session.start();

    smol::block_on(executor.run(async {
        loop {
            let trigger = smol::future::or(
                async { document_rx.recv().await.ok().map(Trigger::Document) },
                async {
                    match settings_rx.recv().await {
                        Ok(_) => Some(Trigger::Settings),
                        Err(_) => smol::future::pending().await,
                    }
                },
            )
            .await;

            match trigger {
                Some(Trigger::Document(change)) => session.document_event(change),
                Some(Trigger::Settings) => {
                    let Some(path) = settings_path.as_deref() else {
                        continue;
                    };
                    match settings::load_or_default(path) {
                        Ok(persisted) => session.settings_changed(persisted),
                        Err(err) => tracing::warn!("keeping previous settings: {err}"),
                    }
                },
                None => break,
            }
        }
    }));

    Ok(())
}

/// The settings file may not exist yet, so only its directory is resolved.
fn canonical_settings_path(path: &Path) -> PathBuf {
    if let Ok(path) = fs::canonicalize(path) {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}
