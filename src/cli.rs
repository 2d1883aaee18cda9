//! `gcode-fmt` front end
//!
//! Reads G-code files (or standard input), prints every line in canonical
//! form and reports the lines that failed to parse.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::block::modal;
use crate::config::{Config, ParseConfig};
use crate::validation::{validate_document, Diagnostic, ValidationResult};

/// Run the command line tool
pub fn run() -> Result<ExitCode> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let (registry, parse_config) = config.build()?;
    log::debug!(
        "Using dialect '{}' (available: {})",
        registry.default_name(),
        registry.list_dialects().join(", ")
    );

    let inputs = read_inputs(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for (name, content) in &inputs {
        let diagnostics = format_document(content, &parse_config, &mut out)?;
        failed |= !diagnostics.is_empty();
        report(name, &diagnostics, config.json, &mut out)?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn read_inputs(config: &Config) -> Result<Vec<(String, String)>> {
    if config.files.is_empty() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;
        return Ok(vec![("<stdin>".to_string(), content)]);
    }

    config
        .files
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read G-code file: {}", path.display()))?;
            Ok((path.display().to_string(), content))
        })
        .collect()
}

/// Write the canonical form of `content`, keeping failing lines as they are
pub fn format_document(
    content: &str,
    config: &ParseConfig,
    out: &mut impl Write,
) -> Result<Vec<Diagnostic>> {
    let ValidationResult {
        blocks,
        diagnostics,
    } = validate_document(content, config, modal::linuxcnc());

    let mut blocks = blocks.into_iter().peekable();
    for (idx, line) in content.lines().enumerate() {
        match blocks.next_if(|b| b.line == idx + 1) {
            Some(parsed) => {
                let mut parts = Vec::with_capacity(parsed.comments.len() + 1);
                if !parsed.block.is_empty() {
                    parts.push(parsed.block.canonical_text());
                }
                parts.extend(parsed.comments.iter().map(|c| c.to_string()));
                writeln!(out, "{}", parts.join(" "))?;
            }
            None => writeln!(out, "{line}")?,
        }
    }

    Ok(diagnostics)
}

fn report(name: &str, diagnostics: &[Diagnostic], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        if !diagnostics.is_empty() {
            let value = serde_json::json!({ "file": name, "diagnostics": diagnostics });
            writeln!(out, "{value}")?;
        }
        return Ok(());
    }

    for diagnostic in diagnostics {
        log::error!(
            "{}:{}: [{}] {}",
            name,
            diagnostic.line,
            diagnostic.kind,
            diagnostic.message
        );
    }
    Ok(())
}
