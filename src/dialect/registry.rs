//! Dialect Registry
//!
//! Explicit name -> dialect registry. Dialects are added by registration only,
//! and the default dialect can only be changed through a validated setter.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::linuxcnc;
use super::schema::{Dialect, DialectFile};
use crate::config::DEFAULT_DIALECT;
use crate::error::Error;

/// Loading priority of a dialect; a higher priority replaces a lower one of the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DialectPriority {
    BuiltIn = 0,
    UserGlobal = 1,
    Explicit = 2,
}

/// A registered dialect with its source and priority
#[derive(Debug, Clone)]
pub struct LoadedDialect {
    pub dialect: Arc<Dialect>,
    pub priority: DialectPriority,
    pub source_path: Option<PathBuf>,
}

/// In-memory dialect registry
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, LoadedDialect>,
    default_dialect: String,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl DialectRegistry {
    /// Empty registry; its default name points at the LinuxCNC dialect once registered
    pub fn new() -> Self {
        Self {
            dialects: HashMap::new(),
            default_dialect: DEFAULT_DIALECT.to_string(),
        }
    }

    /// Registry holding the built-in dialects
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(LoadedDialect {
            dialect: linuxcnc::dialect(),
            priority: DialectPriority::BuiltIn,
            source_path: None,
        });
        registry
    }

    /// Register a dialect; returns false when a higher-priority one of the same name is kept
    pub fn register(&mut self, dialect: Dialect, priority: DialectPriority) -> bool {
        self.insert(LoadedDialect {
            dialect: Arc::new(dialect),
            priority,
            source_path: None,
        })
    }

    fn insert(&mut self, loaded: LoadedDialect) -> bool {
        let name = loaded.dialect.name().to_string();
        let should_load = match self.dialects.get(&name) {
            Some(existing) => loaded.priority >= existing.priority,
            None => true,
        };

        if should_load {
            log::debug!(
                "Registered dialect '{}' ({:?}, {} letters)",
                name,
                loaded.priority,
                loaded.dialect.letters().count()
            );
            self.dialects.insert(name, loaded);
        } else {
            log::debug!("Kept higher priority dialect '{}'", name);
        }
        should_load
    }

    /// Look up a dialect by name
    pub fn resolve(&self, name: &str) -> crate::Result<Arc<Dialect>> {
        self.dialects
            .get(name)
            .map(|loaded| Arc::clone(&loaded.dialect))
            .ok_or_else(|| Error::UnknownDialect(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&LoadedDialect> {
        self.dialects.get(name)
    }

    /// Change the default dialect; the name must already be registered
    pub fn set_default(&mut self, name: &str) -> crate::Result<()> {
        if !self.dialects.contains_key(name) {
            return Err(Error::UnknownDialect(name.to_string()));
        }
        self.default_dialect = name.to_string();
        Ok(())
    }

    pub fn default_name(&self) -> &str {
        &self.default_dialect
    }

    pub fn default_dialect(&self) -> crate::Result<Arc<Dialect>> {
        self.resolve(&self.default_dialect)
    }

    /// Registered dialect names, sorted
    pub fn list_dialects(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Parse dialect TOML, resolving `inherits` against this registry
    pub fn parse_dialect_content(&self, content: &str, source_path: Option<&Path>) -> Result<Dialect> {
        let file: DialectFile = toml::from_str(content).with_context(|| match source_path {
            Some(path) => format!("Failed to parse dialect TOML: {}", path.display()),
            None => "Failed to parse dialect TOML".to_string(),
        })?;

        let base = file
            .dialect
            .inherits
            .as_deref()
            .map(|name| self.resolve(name))
            .transpose()?;

        Ok(Dialect::from_file(file, base.as_deref())?)
    }

    /// Load a single dialect file
    pub fn load_file(&mut self, path: &Path, priority: DialectPriority) -> Result<bool> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dialect file: {}", path.display()))?;
        let dialect = self
            .parse_dialect_content(&content, Some(path))
            .with_context(|| format!("Invalid dialect file: {}", path.display()))?;

        Ok(self.insert(LoadedDialect {
            dialect: Arc::new(dialect),
            priority,
            source_path: Some(path.to_path_buf()),
        }))
    }

    /// Load every `*.toml` dialect file of a directory.
    ///
    /// A missing directory is not an error; files that fail to load are logged
    /// and skipped. Returns the number of dialects registered.
    pub fn load_dir(&mut self, dir: &Path, priority: DialectPriority) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read dialect directory: {}", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        // inheriting files may name a sibling; sorted order keeps loading deterministic
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match self.load_file(&path, priority) {
                Ok(true) => loaded += 1,
                Ok(false) => {}
                Err(e) => log::error!("Failed to load dialect file {}: {:#}", path.display(), e),
            }
        }
        Ok(loaded)
    }
}
