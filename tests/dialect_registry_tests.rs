//! Tests for loading dialect files into the registry
use std::fs;
use std::path::Path;

use gcode_block::dialect::{DialectPriority, DialectRegistry};
use gcode_block::{parse_word, Block, ParseConfig};
use tempfile::TempDir;

const MILL: &str = r#"
[dialect]
name = "mill"
description = "Three axis mill"

[[words]]
letter = "G"
kind = "real"
pattern = '^\d+(?:\.\d)?'
format = "code"

[[words]]
letter = "X"
kind = "real"
pattern = '^[+-]?\d*\.?\d+'
format = "position"

[[words]]
letter = "F"
kind = "real"
pattern = '^\d+'
format = "real"
"#;

const MILL_PLUS: &str = r#"
[dialect]
name = "mill_plus"
inherits = "mill"

[[words]]
letter = "Y"
kind = "real"
pattern = '^[+-]?\d*\.?\d+'
format = "position"
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write dialect file");
}

#[test]
fn test_load_dir_registers_dialects() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a_mill.toml", MILL);
    write(temp.path(), "b_mill_plus.toml", MILL_PLUS);
    write(temp.path(), "notes.txt", "not a dialect");

    let mut registry = DialectRegistry::with_builtin();
    let count = registry
        .load_dir(temp.path(), DialectPriority::UserGlobal)
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        registry.list_dialects(),
        vec!["linuxcnc", "mill", "mill_plus"]
    );

    let loaded = registry.get("mill").unwrap();
    assert_eq!(loaded.priority, DialectPriority::UserGlobal);
    assert_eq!(
        loaded.source_path.as_deref(),
        Some(temp.path().join("a_mill.toml").as_path())
    );
    assert_eq!(loaded.dialect.description(), Some("Three axis mill"));

    let plus = registry.resolve("mill_plus").unwrap();
    assert_eq!(plus.letters().collect::<String>(), "FGXY");
    assert_eq!(plus.description(), Some("Three axis mill"));
}

#[test]
fn test_loaded_dialect_parses_blocks() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "mill.toml", MILL);

    let mut registry = DialectRegistry::with_builtin();
    registry
        .load_dir(temp.path(), DialectPriority::Explicit)
        .unwrap();

    let config = ParseConfig::for_dialect(&registry, "mill").unwrap();
    let block = Block::parse("g1 x-.5 f300", &config, gcode_block::block::modal::linuxcnc())
        .unwrap();
    assert_eq!(block.canonical_text(), "G01 X-0.500 F300.000");

    // Y is not part of this dialect
    assert!(parse_word("Y1", &config).is_err());
}

#[test]
fn test_bad_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "broken.toml", "[dialect\nname = ");
    write(
        temp.path(),
        "orphan.toml",
        r#"
[dialect]
name = "orphan"
inherits = "missing"
"#,
    );
    write(temp.path(), "mill.toml", MILL);

    let mut registry = DialectRegistry::with_builtin();
    let count = registry
        .load_dir(temp.path(), DialectPriority::UserGlobal)
        .unwrap();
    assert_eq!(count, 1);
    assert!(registry.get("orphan").is_none());
    assert!(registry.get("mill").is_some());
}

#[test]
fn test_load_file_reports_errors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("loose.toml");
    fs::write(
        &path,
        r#"
[dialect]
name = "loose"

[[words]]
letter = "X"
kind = "real"
pattern = '\d+'
format = "real"
"#,
    )
    .unwrap();

    let mut registry = DialectRegistry::with_builtin();
    let err = registry
        .load_file(&path, DialectPriority::Explicit)
        .unwrap_err();
    assert!(format!("{err:#}").contains("must start with '^'"));

    let missing = temp.path().join("missing.toml");
    assert!(
        registry
            .load_file(&missing, DialectPriority::Explicit)
            .is_err()
    );
}

#[test]
fn test_missing_dir_loads_nothing() {
    let temp = TempDir::new().unwrap();
    let mut registry = DialectRegistry::with_builtin();
    let count = registry
        .load_dir(&temp.path().join("nope"), DialectPriority::UserGlobal)
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(registry.list_dialects(), vec!["linuxcnc"]);
}

#[test]
fn test_explicit_dir_wins_over_user_dir() {
    let user = TempDir::new().unwrap();
    let explicit = TempDir::new().unwrap();
    write(user.path(), "mill.toml", MILL);
    write(
        explicit.path(),
        "mill.toml",
        &MILL.replace("Three axis mill", "Shop mill"),
    );

    let mut registry = DialectRegistry::with_builtin();
    assert_eq!(
        registry
            .load_dir(explicit.path(), DialectPriority::Explicit)
            .unwrap(),
        1
    );
    // lower priority load of the same name is ignored
    assert_eq!(
        registry
            .load_dir(user.path(), DialectPriority::UserGlobal)
            .unwrap(),
        0
    );

    let mill = registry.get("mill").unwrap();
    assert_eq!(mill.priority, DialectPriority::Explicit);
    assert_eq!(mill.dialect.description(), Some("Shop mill"));
}

#[test]
fn test_file_can_override_builtin() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "linuxcnc.toml",
        r#"
[dialect]
name = "linuxcnc"
inherits = "linuxcnc"
description = "LinuxCNC with integer feed"

[[words]]
letter = "F"
kind = "integer"
pattern = '^\d+'
format = "integer"
"#,
    );

    let mut registry = DialectRegistry::with_builtin();
    registry
        .load_dir(temp.path(), DialectPriority::UserGlobal)
        .unwrap();

    let config = ParseConfig::for_dialect(&registry, "linuxcnc").unwrap();
    assert_eq!(parse_word("F70", &config).unwrap().to_string(), "F70");
    assert_eq!(parse_word("X1", &config).unwrap().to_string(), "X1.000");
}
