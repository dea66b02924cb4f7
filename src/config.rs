use crate::imports::ExternalPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "shadcn-deno.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Registry tree the components are copied from.
    pub source: PathBuf,
    /// Deno source tree the rewritten files land in.
    pub out: PathBuf,
    /// Subdirectories mirrored from `source` into `out`.
    pub dirs: Vec<String>,
    pub exclude: Exclude,
    pub externals: ExternalPolicy,
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub rewrite_externals: bool,
}

/// Glob patterns, relative to the source root, for files left out of the run.
#[derive(Debug, Clone, Default)]
pub struct Exclude {
    patterns: Vec<glob::Pattern>,
}

impl Exclude {
    pub fn new(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|g| {
                glob::Pattern::new(g).with_context(|| format!("invalid exclude pattern: {}", g))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, rel: &Path) -> bool {
        self.patterns.iter().any(|p| p.matches_path(rel))
    }

    /// Whether `path` under `root`, or any directory between the two, is excluded.
    pub fn prunes(&self, root: &Path, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(root) else {
            return false;
        };
        rel.ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| self.matches(a))
    }
}

// --- Raw TOML structures ---
#[derive(Deserialize, Default)]
struct ConfigToml {
    source: Option<String>,
    out: Option<String>,
    dirs: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    externals: Option<ExternalsToml>,
}

#[derive(Deserialize, Default)]
struct ExternalsToml {
    rewrite: Option<bool>,
    scheme: Option<String>,
    core: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("registry/default"),
            out: PathBuf::from("src/default"),
            dirs: default_dirs(),
            exclude: Exclude::default(),
            externals: ExternalPolicy::default(),
        }
    }
}

fn default_dirs() -> Vec<String> {
    vec!["ui".into(), "lib".into(), "hooks".into()]
}

impl AppConfig {
    /// Load from an explicit path, or from `shadcn-deno.toml` when present.
    ///
    /// Without an explicit path and without the default file, built-in
    /// defaults are used.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    tracing::debug!("{} not found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                p
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: ConfigToml = toml::from_str(content).context("failed to parse config toml")?;
        let defaults = Self::default();

        let dirs = raw.dirs.unwrap_or_else(default_dirs);
        if dirs.is_empty() {
            bail!("dirs must name at least one directory");
        }
        for dir in &dirs {
            if dir.is_empty() || Path::new(dir).is_absolute() || dir.contains("..") {
                bail!("dirs entries must be relative directory names: {:?}", dir);
            }
        }

        let ext = raw.externals.unwrap_or_default();
        let scheme = ext.scheme.unwrap_or(defaults.externals.scheme);
        if !scheme.ends_with(':') {
            bail!("externals.scheme must end with ':' (got {:?})", scheme);
        }
        let externals = ExternalPolicy {
            rewrite: ext.rewrite.unwrap_or(defaults.externals.rewrite),
            scheme,
            core: ext.core.unwrap_or(defaults.externals.core),
        };

        Ok(Self {
            source: raw.source.map(PathBuf::from).unwrap_or(defaults.source),
            out: raw.out.map(PathBuf::from).unwrap_or(defaults.out),
            dirs,
            exclude: Exclude::new(&raw.exclude.unwrap_or_default())?,
            externals,
        })
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(source) = &overrides.source {
            self.source = source.clone();
        }
        if let Some(out) = &overrides.out {
            self.out = out.clone();
        }
        if overrides.rewrite_externals {
            self.externals.rewrite = true;
        }
        self
    }
}
