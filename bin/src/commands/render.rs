use crate::{cli::TargetArgs, commands::annotate, preview};
use anyhow::Result;
use headline::Config;
use std::io::Write;

pub fn handle(target: &TargetArgs, config: Config, out: &mut impl Write) -> Result<()> {
    let config = target.apply(config);
    let (document, annotations) = annotate(target, &config)?;
    writeln!(out, "{}", preview::render(&document, &annotations))?;
    Ok(())
}
