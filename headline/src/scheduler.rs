//! Deferred, coalesced recomputation.
//!
//! Hosts report document, viewport and configuration changes to an
//! [`UpdateScheduler`]. The scheduler never recomputes inside the notifying
//! call. The first request spawns one task on a single-threaded
//! [`LocalExecutor`]; requests arriving before that task runs only mark the
//! pending slot. When the task runs it reads the surface's current document
//! and the latest [`Config`], so whatever state exists at that moment wins.
//!
//! The surface is held weakly. A task that finds the surface dropped, or the
//! scheduler disposed, does nothing.

use crate::{
    annotation::AnnotationSet,
    config::Config,
    decoration::{build, build_visible},
    document::LineSource,
};
use smol::LocalExecutor;
use std::{
    cell::RefCell,
    ops::Range,
    rc::{Rc, Weak},
};

/// The host editing surface as seen by the scheduler.
pub trait EditorSurface {
    type Source: LineSource + ?Sized;

    /// Current document. Only borrowed for the duration of one recomputation.
    fn document(&self) -> &Self::Source;

    /// Line indices currently on screen, if the host tracks a viewport.
    fn visible_lines(&self) -> Option<Range<usize>> {
        None
    }

    /// Receive a freshly computed annotation set.
    fn publish(&mut self, annotations: AnnotationSet);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateReason {
    DocumentChanged,
    ViewportChanged,
    ConfigChanged,
}

/// Reasons merged into the single pending recomputation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingUpdate {
    pub document_changed: bool,
    pub viewport_changed: bool,
    pub config_changed: bool,
}

impl PendingUpdate {
    fn record(&mut self, reason: UpdateReason) {
        match reason {
            UpdateReason::DocumentChanged => self.document_changed = true,
            UpdateReason::ViewportChanged => self.viewport_changed = true,
            UpdateReason::ConfigChanged => self.config_changed = true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Change notifications accepted.
    pub requests: usize,
    /// Notifications folded into an already pending recomputation.
    pub coalesced: usize,
    /// Recomputations that published a result.
    pub recomputations: usize,
    /// Pending recomputations dropped because the surface or the scheduler
    /// was gone.
    pub skipped: usize,
}

struct Shared<S> {
    surface: Weak<RefCell<S>>,
    config: Config,
    pending: Option<PendingUpdate>,
    disposed: bool,
    stats: SchedulerStats,
}

pub struct UpdateScheduler<S: EditorSurface + 'static> {
    shared: Rc<RefCell<Shared<S>>>,
    executor: Rc<LocalExecutor<'static>>,
}

impl<S: EditorSurface + 'static> UpdateScheduler<S> {
    pub fn new(
        surface: &Rc<RefCell<S>>,
        config: Config,
        executor: Rc<LocalExecutor<'static>>,
    ) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                surface: Rc::downgrade(surface),
                config,
                pending: None,
                disposed: false,
                stats: SchedulerStats::default(),
            })),
            executor,
        }
    }

    pub fn document_changed(&self) {
        self.request(UpdateReason::DocumentChanged);
    }

    pub fn viewport_changed(&self) {
        self.request(UpdateReason::ViewportChanged);
    }

    /// Replace the configuration and schedule a recomputation with it.
    pub fn set_config(&self, config: Config) {
        self.shared.borrow_mut().config = config;
        self.request(UpdateReason::ConfigChanged);
    }

    pub fn config(&self) -> Config {
        self.shared.borrow().config.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.shared.borrow().stats
    }

    /// Stop publishing. A recomputation already scheduled becomes a no-op and
    /// later notifications are ignored.
    pub fn dispose(&self) {
        self.shared.borrow_mut().disposed = true;
        tracing::debug!("update scheduler disposed");
    }

    /// Record `reason` and make sure exactly one recomputation is pending.
    pub fn request(&self, reason: UpdateReason) {
        {
            let mut guard = self.shared.borrow_mut();
            let shared = &mut *guard;
            if shared.disposed {
                tracing::trace!(?reason, "ignoring change after dispose");
                return;
            }

            shared.stats.requests += 1;
            if let Some(pending) = shared.pending.as_mut() {
                pending.record(reason);
                shared.stats.coalesced += 1;
                tracing::trace!(?reason, "coalesced into pending recomputation");
                return;
            }

            let mut pending = PendingUpdate::default();
            pending.record(reason);
            shared.pending = Some(pending);
        }

        let shared = Rc::downgrade(&self.shared);
        self.executor
            .spawn(async move {
                if let Some(shared) = shared.upgrade() {
                    run_pending(&shared);
                }
            })
            .detach();
        tracing::trace!(?reason, "scheduled recomputation");
    }
}

fn run_pending<S: EditorSurface>(shared: &RefCell<Shared<S>>) {
    let (update, surface, config) = {
        let mut guard = shared.borrow_mut();
        let state = &mut *guard;
        let Some(update) = state.pending.take() else {
            return;
        };
        if state.disposed {
            state.stats.skipped += 1;
            tracing::debug!(?update, "scheduler disposed, skipping recomputation");
            return;
        }
        let Some(surface) = state.surface.upgrade() else {
            state.stats.skipped += 1;
            tracing::debug!(?update, "surface torn down, skipping recomputation");
            return;
        };
        (update, surface, state.config.clone())
    };

    let annotations = {
        let surface = surface.borrow();
        let source = surface.document();
        match surface.visible_lines() {
            Some(lines) => build_visible(source, &config, lines),
            None => build(source, &config),
        }
    };

    shared.borrow_mut().stats.recomputations += 1;
    tracing::debug!(?update, annotations = annotations.len(), "publishing annotations");
    surface.borrow_mut().publish(annotations);
}
