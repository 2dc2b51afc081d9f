//! Subcommand handlers. Each writes its output to the given writer.

pub mod annotations;
pub mod render;
pub mod settings;
pub mod watch;

use crate::{cli::TargetArgs, surface::read_document};
use anyhow::Result;
use headline::{build, build_visible, AnnotationSet, Config, Document};

/// Read the target document and annotate it under the per-run config.
fn annotate(target: &TargetArgs, config: &Config) -> Result<(Document, AnnotationSet)> {
    let document = Document::new(read_document(&target.file)?);
    let annotations = match &target.lines {
        Some(lines) => build_visible(&document, config, lines.clone()),
        None => build(&document, config),
    };
    tracing::debug!(
        file = %target.file.display(),
        annotations = annotations.len(),
        "annotated document"
    );
    Ok((document, annotations))
}
