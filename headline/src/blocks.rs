//! Markdown block structure, line by line.
//!
//! Header detection follows its own hash-run rule (see
//! [`header_marker`](crate::header_marker)), but everything whose native
//! layout must survive indentation (code, lists, quotes, tables, rules) is
//! taken from a block parse. [`MarkdownBlocks`] parses with tree-sitter-md;
//! a host that already holds a parse tree can implement [`BlockStructure`]
//! over it and hand that in instead.

use crate::document::LineSource;
use std::ops::RangeInclusive;
use tree_sitter::{Language, Node, Parser, Tree};

/// Block construct a line belongs to, as far as indentation cares.
///
/// When constructs nest on one line the one ranked last wins, so a fence
/// inside a list item is still a fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    /// The line opening a list item.
    ListItem,
    BlockQuote,
    ThematicBreak,
    Table,
    IndentedCode,
    FencedCode,
    /// Opening or closing line of a fenced code block.
    FenceDelimiter,
}

pub trait BlockStructure {
    /// Innermost indentation-relevant construct on line `index`.
    fn block(&self, index: usize) -> Option<Block>;
}

/// Per-line blocks from a tree-sitter-md parse of a [`LineSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkdownBlocks {
    lines: Vec<Option<Block>>,
}

impl MarkdownBlocks {
    /// Parse `source`. If the grammar cannot be loaded every line is left
    /// unclassified, which degrades to plain content indentation.
    pub fn parse<S: LineSource + ?Sized>(source: &S) -> Self {
        let count = source.line_count();
        let mut text = String::new();
        for index in 0..count {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(source.line(index).text);
        }

        let mut blocks = Self {
            lines: vec![None; count],
        };
        match parse_tree(&text) {
            Some(tree) => blocks.visit(tree.root_node()),
            None => tracing::warn!(lines = count, "markdown parse failed"),
        }
        blocks
    }

    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "fenced_code_block" => self.mark_fence(node),
            "indented_code_block" => self.mark_rows(node, Block::IndentedCode),
            "pipe_table" => self.mark_rows(node, Block::Table),
            "thematic_break" | "setext_h2_underline" => {
                self.mark_rows(node, Block::ThematicBreak)
            },
            "block_quote" => self.mark_rows(node, Block::BlockQuote),
            "list_item" => self.mark(node.start_position().row, Block::ListItem),
            _ => {},
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    /// Rows from the opening delimiter through the closing one, or to the end
    /// of the block when the fence is never closed.
    fn mark_fence(&mut self, node: Node<'_>) {
        let rows = rows(node);
        let mut cursor = node.walk();
        let delimiters: Vec<usize> = node
            .children(&mut cursor)
            .filter(|child| child.kind() == "fenced_code_block_delimiter")
            .map(|child| child.start_position().row)
            .collect();

        let last = match delimiters.as_slice() {
            [_, .., close] => *close,
            _ => *rows.end(),
        };
        for row in *rows.start()..=last {
            self.mark(row, Block::FencedCode);
        }
        self.mark(*rows.start(), Block::FenceDelimiter);
        for row in delimiters {
            self.mark(row, Block::FenceDelimiter);
        }
    }

    fn mark_rows(&mut self, node: Node<'_>, block: Block) {
        for row in rows(node) {
            self.mark(row, block);
        }
    }

    fn mark(&mut self, row: usize, block: Block) {
        if let Some(slot) = self.lines.get_mut(row) {
            *slot = (*slot).max(Some(block));
        }
    }
}

impl BlockStructure for MarkdownBlocks {
    fn block(&self, index: usize) -> Option<Block> {
        self.lines.get(index).copied().flatten()
    }
}

fn parse_tree(text: &str) -> Option<Tree> {
    let language: Language = tree_sitter_md::LANGUAGE.into();
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&language) {
        tracing::warn!("failed to load markdown grammar: {err}");
        return None;
    }
    parser.parse(text, None)
}

/// Rows a block node spans. Block nodes usually end at column 0 of the row
/// after their last line.
fn rows(node: Node<'_>) -> RangeInclusive<usize> {
    let start = node.start_position();
    let end = node.end_position();
    let last = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    start.row..=last
}
