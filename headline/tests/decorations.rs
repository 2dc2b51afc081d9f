//! Annotation behaviour over whole documents.

use headline::{
    build, AnnotationKind, AnnotationSet, Config, Document, LineIndent, LineRole, LineSource,
    Payload,
};
use std::num::NonZeroU32;

fn include_top() -> Config {
    Config::default().with_ignore_top_level_header(false)
}

fn unit(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

/// Line indentation attached to line `index`, if any.
fn indent_of(doc: &Document, set: &AnnotationSet, index: usize) -> Option<LineIndent> {
    let start = doc.line(index).start;
    set.iter().find_map(|a| match a.payload {
        Payload::LineIndent(indent) if a.range.start == start => Some(indent),
        _ => None,
    })
}

fn padding_of(doc: &Document, set: &AnnotationSet, index: usize) -> Option<u32> {
    indent_of(doc, set, index).map(|indent| indent.padding)
}

fn header_levels(set: &AnnotationSet) -> Vec<u8> {
    set.iter()
        .filter_map(|a| match a.payload {
            Payload::MarkerReplace { level } => Some(level),
            _ => None,
        })
        .collect()
}

#[test]
fn documents_without_headers_have_no_annotations() {
    for text in [
        "",
        "plain text\nmore text",
        "- a list\n- more\n\n> quote",
        "```\n# inside a fence\n```",
        "##notaheader\n#also-not\n####### seven hashes",
        "##\nContent",
        " ## indented hashes",
    ] {
        let set = build(&Document::new(text), &include_top());
        assert!(set.is_empty(), "expected no annotations for {text:?}, got {set:?}");
    }
}

#[test]
fn every_level_indents_its_section() {
    let config = include_top().with_indent_unit(unit(3));
    for level in 1..=6u8 {
        let hashes = "#".repeat(level as usize);
        let text = format!("{hashes} Heading\nalpha\nbeta\n{hashes} Next\ngamma");
        let doc = Document::new(text);
        let set = build(&doc, &config);

        assert_eq!(header_levels(&set), vec![level, level]);
        let expected = u32::from(level) * 3;
        assert_eq!(padding_of(&doc, &set, 1), Some(expected));
        assert_eq!(padding_of(&doc, &set, 2), Some(expected));
        assert_eq!(padding_of(&doc, &set, 4), Some(expected));

        let header_padding = padding_of(&doc, &set, 0);
        if level == 1 {
            assert_eq!(header_padding, None);
        } else {
            assert_eq!(header_padding, Some(u32::from(level - 1) * 3));
        }
    }
}

#[test]
fn shallower_header_ends_a_deeper_section() {
    let doc = Document::new("### Deep\ndeep body\n## Shallow\nshallow body");
    let set = build(&doc, &include_top());
    assert_eq!(padding_of(&doc, &set, 1), Some(6));
    assert_eq!(padding_of(&doc, &set, 3), Some(4));
}

#[test]
fn build_is_idempotent() {
    let doc = Document::new(
        "# Title\nintro\n## Section\n- item\n  - nested\n> quote\n\n```\ncode\n```\n### Sub\ntext",
    );
    let config = include_top();
    let first = build(&doc, &config);
    let second = build(&doc, &config);
    assert_eq!(first, second);
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
}

#[test]
fn annotations_are_in_display_order() {
    let doc = Document::new("## A\ntext\n### B\n- item\n#### C\n> quote\n## D\n\ntail");
    let set = build(&doc, &include_top());
    assert!(set.is_ordered());

    for pair in set.as_slice().windows(2) {
        assert!(pair[0].range.start <= pair[1].range.start);
        if pair[0].range.start == pair[1].range.start {
            assert!(pair[1].kind() != AnnotationKind::BulletInsert);
        }
    }

    let first_per_header: Vec<_> = set
        .iter()
        .filter(|a| a.kind() == AnnotationKind::MarkerReplace)
        .map(|marker| {
            set.iter()
                .find(|a| a.range.start == marker.range.start)
                .map(|a| a.kind())
        })
        .collect();
    assert!(first_per_header
        .iter()
        .all(|kind| *kind == Some(AnnotationKind::BulletInsert)));
}

#[test]
fn hash_run_without_space_is_plain_text() {
    let doc = Document::new("##notaheader\nContent");
    let set = build(&doc, &include_top());
    assert!(set.is_empty());
}

#[test]
fn content_under_level_two() {
    let doc = Document::new("## H\nContent");
    let set = build(&doc, &Config::default());
    assert_eq!(padding_of(&doc, &set, 0), Some(2));
    assert_eq!(padding_of(&doc, &set, 1), Some(4));
}

#[test]
fn skipped_levels_follow_the_nearest_header() {
    let doc = Document::new("## H\nContent\n### H\nContent\n##### H\nContent");
    let set = build(&doc, &Config::default());
    assert_eq!(padding_of(&doc, &set, 1), Some(4));
    assert_eq!(padding_of(&doc, &set, 3), Some(6));
    assert_eq!(padding_of(&doc, &set, 5), Some(10));

    let set = build(&doc, &include_top());
    assert_eq!(padding_of(&doc, &set, 1), Some(4));
    assert_eq!(padding_of(&doc, &set, 3), Some(6));
    assert_eq!(padding_of(&doc, &set, 5), Some(10));
}

#[test]
fn ignoring_titles_does_not_shift_deeper_levels() {
    let doc = Document::new("### H\nContent\n## G\nMore");
    let set = build(&doc, &Config::default());
    assert_eq!(padding_of(&doc, &set, 0), Some(4));
    assert_eq!(padding_of(&doc, &set, 1), Some(6));
    assert_eq!(padding_of(&doc, &set, 2), Some(2));
    assert_eq!(padding_of(&doc, &set, 3), Some(4));

    assert_eq!(build(&doc, &include_top()), set);
}

#[test]
fn title_header_is_ignored_by_default() {
    let doc = Document::new("# Title\nBody");
    let set = build(&doc, &Config::default());
    assert!(set.is_empty());

    let set = build(&doc, &include_top());
    assert_eq!(header_levels(&set), vec![1]);
    assert_eq!(padding_of(&doc, &set, 0), None);
    assert_eq!(padding_of(&doc, &set, 1), Some(2));
}

#[test]
fn ignored_title_leaves_later_sections_alone() {
    let doc = Document::new("# Title\nintro\n## Section\nbody");
    let set = build(&doc, &Config::default());
    assert_eq!(header_levels(&set), vec![2]);
    assert_eq!(padding_of(&doc, &set, 1), None);
    assert_eq!(padding_of(&doc, &set, 2), Some(2));
    assert_eq!(padding_of(&doc, &set, 3), Some(4));
}

#[test]
fn list_markers_stay_at_the_section_padding() {
    let doc = Document::new("## H\n- item\n  - nested\n1. numbered");
    let set = build(&doc, &Config::default());

    for index in 1..=3 {
        let indent = indent_of(&doc, &set, index).unwrap();
        assert_eq!(indent.role, LineRole::ListItem);
        assert_eq!(indent.first_row_column(), 4);
    }

    let nested = indent_of(&doc, &set, 2).unwrap();
    assert_eq!(nested.padding, 4 + 4);
    assert_eq!(nested.text_indent, -4);
}

#[test]
fn block_quotes_hang_like_list_items() {
    let doc = Document::new("### H\n> quoted text");
    let set = build(&doc, &Config::default());
    let indent = indent_of(&doc, &set, 1).unwrap();
    assert_eq!(indent.role, LineRole::BlockQuote);
    assert_eq!(indent.padding, 6 + 2);
    assert_eq!(indent.first_row_column(), 6);
}

#[test]
fn fenced_code_is_never_indented() {
    for level in 2..=6 {
        let hashes = "#".repeat(level);
        let doc = Document::new(format!(
            "{hashes} H\n```rust\nfn main() {{}}\n\n    indented();\n```\nafter"
        ));
        let set = build(&doc, &Config::default());
        for index in 1..=5 {
            assert_eq!(indent_of(&doc, &set, index), None, "line {index}");
        }
        assert_eq!(padding_of(&doc, &set, 6), Some(level as u32 * 2));
    }
}

#[test]
fn tables_and_rules_are_not_indented() {
    let doc = Document::new("## H\n| a | b |\n|---|---|\n| 1 | 2 |\n\n---\ntext");
    let set = build(&doc, &Config::default());
    for index in [1, 2, 3, 5] {
        assert_eq!(indent_of(&doc, &set, index), None, "line {index}");
    }
    assert_eq!(padding_of(&doc, &set, 6), Some(4));
}

#[test]
fn indented_code_after_a_blank_line_is_not_indented() {
    let doc = Document::new("## H\npara\n\n    code\nafter");
    let set = build(&doc, &Config::default());
    assert_eq!(padding_of(&doc, &set, 1), Some(4));
    assert_eq!(indent_of(&doc, &set, 3), None);
    assert_eq!(padding_of(&doc, &set, 4), Some(4));
}

#[test]
fn indented_code_right_after_a_block_is_not_indented() {
    let doc = Document::new("## H\n    let x = 1;\n    let y = 2;");
    let set = build(&doc, &include_top());
    assert_eq!(indent_of(&doc, &set, 1), None);
    assert_eq!(indent_of(&doc, &set, 2), None);

    let doc = Document::new("## H\n```\ncode\n```\n    indented\n\n---\n    after rule");
    let set = build(&doc, &include_top());
    for index in [1, 2, 3, 4, 6, 7] {
        assert_eq!(indent_of(&doc, &set, index), None, "line {index}");
    }
}

#[test]
fn blank_lines_are_never_annotated() {
    let doc = Document::new("## H\n\ntext\n   \nmore");
    let set = build(&doc, &Config::default());
    assert_eq!(indent_of(&doc, &set, 1), None);
    assert_eq!(indent_of(&doc, &set, 3), None);
    assert_eq!(padding_of(&doc, &set, 4), Some(4));
}

#[test]
fn two_blank_lines_end_a_section_unless_a_list_precedes() {
    let doc = Document::new("## H\ntext\n\n\nloose");
    let set = build(&doc, &Config::default());
    assert_eq!(padding_of(&doc, &set, 4), None);

    let doc = Document::new("## H\n- item\n\n\n- item");
    let set = build(&doc, &Config::default());
    assert_eq!(indent_of(&doc, &set, 4).map(|i| i.first_row_column()), Some(4));
}

#[test]
fn empty_header_still_opens_a_section() {
    let doc = Document::new("## \nContent");
    let set = build(&doc, &Config::default());
    assert_eq!(header_levels(&set), vec![2]);
    assert_eq!(padding_of(&doc, &set, 1), Some(4));
}

#[test]
fn marker_covers_hashes_and_one_separator() {
    let doc = Document::new("intro\n###  Two spaces");
    let set = build(&doc, &Config::default());
    let marker = set
        .iter()
        .find(|a| a.kind() == AnnotationKind::MarkerReplace)
        .unwrap();
    assert_eq!(marker.range, 6..10);
    assert!(marker.is_atomic());
}

#[test]
fn text_is_never_modified() {
    let text = "## H\n- item\ncontent";
    let doc = Document::new(text);
    let _ = build(&doc, &Config::default());
    assert_eq!(doc.text(), text);
}

#[test]
fn serializes_for_hosts() {
    let doc = Document::new("## H\nbody");
    let set = build(&doc, &Config::default());
    let json = serde_json::to_value(&set).unwrap();

    assert_eq!(json[0]["kind"], "bullet_insert");
    assert_eq!(json[0]["glyph"], "○");
    assert_eq!(json[0]["range"]["start"], 0);
    assert_eq!(json[1]["kind"], "line_indent");
    assert_eq!(json[1]["role"], "header");
    assert_eq!(json[1]["padding"], 2);
    assert_eq!(json[2]["kind"], "marker_replace");
    assert_eq!(json[2]["range"]["end"], 3);
    assert_eq!(json[3]["kind"], "line_indent");
    assert_eq!(json[3]["role"], "content");
    assert_eq!(json[3]["padding"], 4);
    assert_eq!(json[3]["text_indent"], 0);
}
