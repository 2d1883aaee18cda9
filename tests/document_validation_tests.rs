//! Tests for line-by-line document processing and the formatter
use gcode_block::block::modal;
use gcode_block::cli::format_document;
use gcode_block::parser::{split_comments, strip_comments};
use gcode_block::validation::validate_line;
use gcode_block::{validate_document, ParseConfig};

const PROGRAM: &str = "\
%
O1000
(facing pass)
G21 G90 G17
G0 X0 Y0 Z5 ; rapid to start
G1 Z-1 F300
G1 X50.5 (cut)
G2 X60 Y10 I5 J5 G3
M3 M5
M30
%
";

#[test]
fn test_program_diagnostics() {
    let result = validate_document(PROGRAM, &ParseConfig::default(), modal::linuxcnc());

    let failed: Vec<(usize, &str)> = result
        .diagnostics
        .iter()
        .map(|d| (d.line, d.kind))
        .collect();
    assert_eq!(
        failed,
        vec![
            (1, "leftover-text"),
            (8, "same-modal-group-in-block"),
            (9, "same-modal-group-in-block"),
            (11, "leftover-text"),
        ]
    );
    assert_eq!(result.blocks.len(), 7);
    assert!(!result.is_valid());

    let program_name = &result.blocks[0];
    assert_eq!(program_name.line, 2);
    assert_eq!(program_name.block.canonical_text(), "O1000");

    let comment_only = &result.blocks[1];
    assert!(comment_only.block.is_empty());
    assert_eq!(comment_only.comments, vec!["(facing pass)"]);
}

#[test]
fn test_modal_group_message_names_both_codes() {
    let result = validate_document("G0 X1 G1 X2\n", &ParseConfig::default(), modal::linuxcnc());
    let diagnostic = &result.diagnostics[0];
    assert_eq!(
        diagnostic.message,
        "'G00' and 'G01' cannot be in the same block (modal group 'motion')"
    );
}

#[test]
fn test_validate_line_keeps_comments() {
    let config = ParseConfig::default();
    let (block, comments) =
        validate_line("G1 (move) X1 ; done", &config, modal::linuxcnc()).unwrap();
    assert_eq!(block.canonical_text(), "G01 X1.000");
    assert_eq!(comments, vec!["(move)", "; done"]);

    let split = split_comments("M3 (spin up");
    assert_eq!(split.code.trim(), "M3");
    assert_eq!(split.comments, vec!["(spin up"]);
    assert_eq!(strip_comments("G0 X1 ; fast").trim(), "G0 X1");
}

#[test]
fn test_format_document_output() {
    let mut out = Vec::new();
    let diagnostics =
        format_document(PROGRAM, &ParseConfig::default(), &mut out).expect("format document");
    assert_eq!(diagnostics.len(), 4);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "%",
            "O1000",
            "(facing pass)",
            "G21 G90 G17",
            "G00 X.000 Y.000 Z5.000 ; rapid to start",
            "G01 Z-1.000 F300.000",
            "G01 X50.500 (cut)",
            "G2 X60 Y10 I5 J5 G3",
            "M3 M5",
            "M30",
            "%",
        ]
    );
}

#[test]
fn test_format_document_is_stable() {
    let config = ParseConfig::default().with_xy_decimals(4).unwrap();
    let mut first = Vec::new();
    format_document(PROGRAM, &config, &mut first).unwrap();
    let first = String::from_utf8(first).unwrap();

    let mut second = Vec::new();
    format_document(&first, &config, &mut second).unwrap();
    assert_eq!(String::from_utf8(second).unwrap(), first);
}
