//! Live preview sessions, driven without a real filesystem watcher.

use headline::{Config, EditorSurface};
use headline_bin::{
    cli::TargetArgs,
    commands::watch::WatchSession,
    surface::FileSurface,
    watcher::FileChange,
};
use smol::LocalExecutor;
use std::{fs, path::PathBuf, rc::Rc};
use tempfile::{tempdir, TempDir};

struct Harness {
    _tmp_dir: TempDir,
    file: PathBuf,
    executor: Rc<LocalExecutor<'static>>,
    session: WatchSession<Vec<u8>>,
}

impl Harness {
    fn new(text: &str) -> Self {
        Self::with_target(text, |_| {})
    }

    fn with_target(text: &str, adjust: impl FnOnce(&mut TargetArgs)) -> Self {
        headline_log::test();
        let tmp_dir = tempdir().unwrap();
        let file = tmp_dir.path().join("notes.md");
        fs::write(&file, text).unwrap();

        let mut target = TargetArgs {
            file: file.clone(),
            indent_unit: None,
            include_top_level: false,
            lines: None,
        };
        adjust(&mut target);

        let executor = Rc::new(LocalExecutor::new());
        let surface = FileSurface::open(&file, Vec::new()).unwrap();
        let session = WatchSession::new(surface, &target, Config::default(), executor.clone());
        Self {
            _tmp_dir: tmp_dir,
            file,
            executor,
            session,
        }
    }

    fn run_until_idle(&self) {
        while self.executor.try_tick() {}
    }

    fn write(&self, text: &str) {
        fs::write(&self.file, text).unwrap();
        self.session.document_event(FileChange::Modified);
    }

    fn output(&self) -> String {
        String::from_utf8(self.session.surface().output().clone()).unwrap()
    }
}

#[test]
fn start_renders_once() {
    let harness = Harness::new("## A\nbody");
    harness.session.start();
    assert_eq!(harness.output(), "");

    harness.run_until_idle();
    assert_eq!(harness.output(), "  ○ A\n    body\n");
}

#[test]
fn save_bursts_render_once() {
    let harness = Harness::new("## A\nbody");
    harness.session.start();
    harness.run_until_idle();

    harness.write("## B\nbody");
    harness.write("## C\nbody");
    harness.session.document_event(FileChange::Modified);
    harness.run_until_idle();

    assert_eq!(harness.session.surface().published(), 2);
    assert!(harness.output().ends_with("\n\n  ○ C\n    body\n"));
    let stats = harness.session.scheduler().stats();
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.coalesced, 1);
}

#[test]
fn unchanged_contents_do_not_rerender() {
    let harness = Harness::new("## A\nbody");
    harness.session.start();
    harness.run_until_idle();

    harness.write("## A\nbody");
    harness.run_until_idle();
    assert_eq!(harness.session.surface().published(), 1);
}

#[test]
fn removed_document_keeps_the_last_preview() {
    let harness = Harness::new("## A\nbody");
    harness.session.start();
    harness.run_until_idle();

    fs::remove_file(&harness.file).unwrap();
    harness.session.document_event(FileChange::Removed);
    harness.session.document_event(FileChange::Modified);
    harness.run_until_idle();

    assert_eq!(harness.session.surface().published(), 1);
    assert_eq!(harness.session.surface().document().text(), "## A\nbody");
}

#[test]
fn settings_changes_rerender_with_run_overrides_on_top() {
    let harness = Harness::with_target("# T\n## A\nbody", |target| {
        target.indent_unit = std::num::NonZeroU32::new(4);
    });
    harness.session.start();
    harness.run_until_idle();
    assert_eq!(harness.output(), "# T\n    ○ A\n        body\n");

    harness
        .session
        .settings_changed(Config::default().with_ignore_top_level_header(false));
    harness.run_until_idle();

    let config = harness.session.scheduler().config();
    assert_eq!(config.indent_unit.get(), 4);
    assert!(!config.ignore_top_level_header);
    assert!(harness
        .output()
        .ends_with("\n\n● T\n    ○ A\n        body\n"));
}

#[test]
fn identical_settings_are_ignored() {
    let harness = Harness::new("## A\nbody");
    harness.session.start();
    harness.run_until_idle();

    harness.session.settings_changed(Config::default());
    harness.run_until_idle();
    assert_eq!(harness.session.surface().published(), 1);
}

#[test]
fn visible_lines_carry_into_the_session() {
    let harness = Harness::with_target("## A\none\ntwo", |target| {
        target.lines = Some(2..3);
    });
    harness.session.start();
    harness.run_until_idle();
    assert_eq!(harness.output(), "## A\none\n    two\n");
}
