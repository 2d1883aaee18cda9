//! Dialect System
//!
//! Named sets of per-letter grammar rules, the built-in LinuxCNC dialect, and
//! the registry resolving dialects by name.

pub mod format;
pub mod linuxcnc;
pub mod registry;
pub mod schema;

pub use registry::{DialectPriority, DialectRegistry, LoadedDialect};
pub use schema::{Dialect, DialectFile, ValueFormat, ValueKind, WordDef, WordTypeRule};
