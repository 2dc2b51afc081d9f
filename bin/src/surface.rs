//! A file on disk presented through a terminal.

use crate::preview;
use anyhow::{Context, Result};
use headline::{AnnotationSet, Document, EditorSurface};
use std::{
    fs,
    io::{self, Write},
    ops::Range,
    path::{Path, PathBuf},
};

/// [`EditorSurface`] over a document file; every publish re-renders the
/// preview to `out`.
pub struct FileSurface<W> {
    path: PathBuf,
    document: Document,
    visible: Option<Range<usize>>,
    out: W,
    published: usize,
}

impl<W: Write> FileSurface<W> {
    pub fn open(path: impl Into<PathBuf>, out: W) -> Result<Self> {
        let path = path.into();
        let text = read_document(&path)?;
        Ok(Self {
            path,
            document: Document::new(text),
            visible: None,
            out,
            published: 0,
        })
    }

    pub fn with_visible_lines(mut self, visible: Option<Range<usize>>) -> Self {
        self.visible = visible;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file. Returns whether the text changed.
    pub fn reload(&mut self) -> Result<bool> {
        let text = read_document(&self.path)?;
        if text == self.document.text() {
            return Ok(false);
        }
        self.document = Document::new(text);
        Ok(true)
    }

    /// Number of annotation sets published so far.
    pub fn published(&self) -> usize {
        self.published
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn write_preview(&mut self, annotations: &AnnotationSet) -> io::Result<()> {
        let rendered = preview::render(&self.document, annotations);
        if self.published > 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{rendered}")?;
        self.out.flush()
    }
}

impl<W: Write> EditorSurface for FileSurface<W> {
    type Source = Document;

    fn document(&self) -> &Document {
        &self.document
    }

    fn visible_lines(&self) -> Option<Range<usize>> {
        self.visible.clone()
    }

    fn publish(&mut self, annotations: AnnotationSet) {
        if let Err(err) = self.write_preview(&annotations) {
            tracing::warn!(path = %self.path.display(), "failed to write preview: {err}");
        }
        self.published += 1;
    }
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
