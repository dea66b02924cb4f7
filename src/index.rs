use crate::config::Exclude;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Logical module path (`ui/button`) to file extension (`.tsx`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileIndex {
    entries: BTreeMap<String, String>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root/<dir>` for every dir and record each regular file.
    ///
    /// A missing dir or an unreadable entry is only a warning. Excluded
    /// directories are pruned whole, the same way the mirror walk does.
    pub fn scan(root: &Path, dirs: &[String], exclude: &Exclude) -> Self {
        let mut index = Self::new();
        for dir in dirs {
            let base = root.join(dir);
            if !base.is_dir() {
                tracing::warn!("index: directory not found, skipping: {}", base.display());
                continue;
            }
            let before = index.len();
            let walker = WalkDir::new(&base)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !exclude.prunes(root, e.path()));
            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!(
                            "index: skipping unreadable entry in {}: {}",
                            base.display(),
                            err
                        );
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(root) else {
                    continue;
                };
                if let Some(previous) = index.insert(rel) {
                    tracing::debug!("index: {} replaces {}", rel.display(), previous);
                }
            }
            tracing::debug!(dir = %dir, files = index.len() - before, "indexed");
        }
        index
    }

    /// Record a root-relative file path. Returns the extension it replaced.
    pub fn insert(&mut self, rel: &Path) -> Option<String> {
        let (key, ext) = logical_entry(rel)?;
        self.entries.insert(key, ext)
    }

    pub fn extension(&self, logical: &str) -> Option<&str> {
        self.entries.get(logical).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `ui/button.tsx` -> (`ui/button`, `.tsx`). Files without an extension are not indexed.
fn logical_entry(rel: &Path) -> Option<(String, String)> {
    let ext = rel.extension()?.to_str()?;
    let stem = rel.with_extension("");
    let mut parts: Vec<&str> = Vec::new();
    for comp in stem.components() {
        if let Component::Normal(os) = comp {
            parts.push(os.to_str()?);
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some((parts.join("/"), format!(".{}", ext)))
}
