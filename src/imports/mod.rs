//! Import discovery, classification and rewriting for registry sources.

pub mod classify;
pub mod rewrite;
pub mod rules;
pub mod scanner;

pub use classify::{Category, ExternalPolicy, classify};
pub use rewrite::{Rewriter, Rewritten, resolve_extension};
pub use rules::{Remap, Rule, RuleSet};
pub use scanner::{ImportKind, ImportSite, extract_specifiers, scan_import_sites};
