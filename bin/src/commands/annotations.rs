use crate::{cli::TargetArgs, commands::annotate};
use anyhow::Result;
use headline::{AnnotationSet, Config, LineSource};
use serde::Serialize;
use std::io::Write;

/// JSON document printed by `headline annotations`.
#[derive(Serialize)]
struct Report<'a> {
    config: &'a Config,
    line_count: usize,
    annotations: &'a AnnotationSet,
}

pub fn handle(
    target: &TargetArgs,
    config: Config,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let config = target.apply(config);
    let (document, annotations) = annotate(target, &config)?;
    let report = Report {
        config: &config,
        line_count: document.line_count(),
        annotations: &annotations,
    };

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &report)?;
    } else {
        serde_json::to_writer(&mut *out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}
