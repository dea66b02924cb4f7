use crate::imports::rules::RuleSet;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Local,
    /// Allow-listed external package, only reported while externals are rewritten.
    Core,
    External,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Local => "local",
            Category::Core => "core",
            Category::External => "external",
        }
    }
}

/// How bare external specifiers are treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPolicy {
    /// Prefix non-core externals with `scheme`. Off by default.
    pub rewrite: bool,
    pub scheme: String,
    /// Packages left bare even when rewriting; subpaths included.
    pub core: Vec<String>,
}

impl Default for ExternalPolicy {
    fn default() -> Self {
        Self {
            rewrite: false,
            scheme: "npm:".to_string(),
            core: vec!["react".to_string(), "react-dom".to_string()],
        }
    }
}

impl ExternalPolicy {
    pub fn is_core(&self, specifier: &str) -> bool {
        self.core.iter().any(|pkg| {
            specifier == pkg
                || specifier
                    .strip_prefix(pkg.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Prefixed form of an external specifier, or `None` to leave it alone.
    pub fn rewrite(&self, specifier: &str) -> Option<String> {
        if !self.rewrite
            || self.is_core(specifier)
            || has_scheme(specifier)
            || specifier.starts_with('.')
            || specifier.starts_with('/')
        {
            return None;
        }
        Some(format!("{}{}", self.scheme, specifier))
    }
}

/// `npm:`, `jsr:`, `node:`, `https:` ...
pub fn has_scheme(specifier: &str) -> bool {
    SCHEME_RE.is_match(specifier)
}

pub fn classify(specifier: &str, rules: &RuleSet, externals: &ExternalPolicy) -> Category {
    if rules.is_local(specifier) {
        Category::Local
    } else if externals.rewrite && externals.is_core(specifier) {
        Category::Core
    } else {
        Category::External
    }
}
