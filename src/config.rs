//! Configuration management.
//!
//! Handles:
//! - Parse configuration threaded through words, tokenizer and blocks
//! - Command-line argument parsing for `gcode-fmt`
//! - Dialect directory configuration

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::dialect::registry::DialectPriority;
use crate::dialect::{linuxcnc, Dialect, DialectRegistry};
use crate::error::{Error, Result};

/// Dialect used when none is named
pub const DEFAULT_DIALECT: &str = linuxcnc::NAME;
/// Decimal places rendered for X and Y when none are given
pub const DEFAULT_XY_DECIMALS: u8 = 3;
pub const MAX_XY_DECIMALS: u8 = 15;

/// Validated number of decimal places for position rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Precision(u8);

impl Precision {
    pub const DEFAULT: Precision = Precision(DEFAULT_XY_DECIMALS);

    /// Fails for negative values and values above [`MAX_XY_DECIMALS`]
    pub fn new(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(decimals) if decimals <= MAX_XY_DECIMALS => Ok(Self(decimals)),
            _ => Err(Error::InvalidPrecision {
                value,
                max: MAX_XY_DECIMALS,
            }),
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything a word, the tokenizer or a block needs to know besides the text
#[derive(Debug, Clone, PartialEq)]
pub struct ParseConfig {
    pub dialect: Arc<Dialect>,
    pub xy_decimals: Precision,
    /// Check instructions of a block for repeated codes and modal groups
    pub verify: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(linuxcnc::dialect())
    }
}

impl ParseConfig {
    pub fn new(dialect: Arc<Dialect>) -> Self {
        Self {
            dialect,
            xy_decimals: Precision::DEFAULT,
            verify: true,
        }
    }

    /// Configuration for a dialect looked up by name
    pub fn for_dialect(registry: &DialectRegistry, name: &str) -> Result<Self> {
        Ok(Self::new(registry.resolve(name)?))
    }

    pub fn with_xy_decimals(mut self, decimals: i64) -> Result<Self> {
        self.xy_decimals = Precision::new(decimals)?;
        Ok(self)
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// Command-line arguments for `gcode-fmt`
#[derive(Debug, Parser)]
#[command(name = "gcode-fmt")]
#[command(about = "Parse G-code lines and print them in canonical form")]
#[command(version)]
pub struct Args {
    /// G-code files to read (standard input when none are given)
    pub files: Vec<PathBuf>,

    #[arg(long, help = "G-code dialect to use (e.g., 'linuxcnc')")]
    pub dialect: Option<String>,

    #[arg(long, help = "Directory containing dialect TOML files")]
    pub dialect_dir: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = i64::from(DEFAULT_XY_DECIMALS),
        allow_negative_numbers = true,
        help = "Decimal places used for X and Y values"
    )]
    pub xy_decimals: i64,

    #[arg(long, help = "Do not reject blocks with repeated codes or modal groups")]
    pub no_verify: bool,

    #[arg(long, help = "Report diagnostics as JSON on standard output")]
    pub json: bool,

    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    /// Dialect name explicitly set via command line
    pub cli_dialect: Option<String>,
    /// Dialect directories to load, lowest priority first
    pub dialect_dirs: Vec<(PathBuf, DialectPriority)>,
    pub xy_decimals: Precision,
    pub verify: bool,
    pub json: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> anyhow::Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let mut dialect_dirs = Vec::new();

        // User config directory first, so an explicit directory wins on name clashes
        if let Some(config_dir) = dirs::config_dir() {
            dialect_dirs.push((
                config_dir.join("gcode-block").join("dialects"),
                DialectPriority::UserGlobal,
            ));
        }

        if let Some(custom_dir) = args.dialect_dir {
            dialect_dirs.push((custom_dir, DialectPriority::Explicit));
        }

        Ok(Config {
            files: args.files,
            cli_dialect: args.dialect,
            dialect_dirs,
            xy_decimals: Precision::new(args.xy_decimals)?,
            verify: !args.no_verify,
            json: args.json,
            log_level: args.log_level,
        })
    }

    /// Dialect name to parse with: the CLI choice, else the built-in default
    pub fn effective_dialect(&self) -> &str {
        self.cli_dialect.as_deref().unwrap_or(DEFAULT_DIALECT)
    }

    /// Build the registry (built-ins plus configured directories) and the parse configuration
    pub fn build(&self) -> anyhow::Result<(DialectRegistry, ParseConfig)> {
        let mut registry = DialectRegistry::with_builtin();
        for (dir, priority) in &self.dialect_dirs {
            let count = registry.load_dir(dir, *priority)?;
            if count > 0 {
                log::info!("Loaded {} dialect(s) from {}", count, dir.display());
            }
        }
        registry.set_default(self.effective_dialect())?;

        let parse_config = ParseConfig {
            dialect: registry.default_dialect()?,
            xy_decimals: self.xy_decimals,
            verify: self.verify,
        };
        Ok((registry, parse_config))
    }
}
