use crate::config::AppConfig;
use crate::imports::{RuleSet, Rewriter};
use crate::index::FileIndex;
use crate::report::ImportReport;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copy and rewrite into the output tree.
    Write,
    /// Read and rewrite in memory only.
    DryRun,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorStats {
    pub dirs: usize,
    pub missing_dirs: usize,
    pub files: usize,
    /// Files with at least one rewritten specifier.
    pub files_changed: usize,
    /// Rewritten specifiers across all files.
    pub specifiers_changed: usize,
}

/// Mirror every configured subdirectory of `cfg.source` into `cfg.out`.
///
/// The index must be complete before this is called. A missing
/// subdirectory is skipped with a warning; any other I/O failure aborts the
/// run and leaves already written files in place.
pub fn mirror_tree(
    cfg: &AppConfig,
    rules: &RuleSet,
    index: &FileIndex,
    report: &mut ImportReport,
    mode: Mode,
) -> Result<MirrorStats> {
    if !cfg.source.is_dir() {
        bail!("source directory does not exist: {}", cfg.source.display());
    }

    let rewriter = Rewriter::new(rules, index, &cfg.externals);
    let mut stats = MirrorStats::default();

    for dir in &cfg.dirs {
        let src_dir = cfg.source.join(dir);
        if !src_dir.is_dir() {
            tracing::warn!("source directory not found, skipping: {}", src_dir.display());
            stats.missing_dirs += 1;
            continue;
        }
        let dest_dir = cfg.out.join(dir);
        if mode == Mode::Write {
            fs::create_dir_all(&dest_dir)
                .with_context(|| format!("failed to create {}", dest_dir.display()))?;
        }
        tracing::info!("processing {} -> {}", src_dir.display(), dest_dir.display());

        let walker = WalkDir::new(&src_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !cfg.exclude.prunes(&cfg.source, e.path()));
        for entry in walker {
            let entry =
                entry.with_context(|| format!("failed to walk {}", src_dir.display()))?;
            let rel = entry
                .path()
                .strip_prefix(&src_dir)
                .with_context(|| format!("unexpected path {}", entry.path().display()))?;
            let dest = dest_dir.join(rel);

            if entry.file_type().is_dir() {
                if mode == Mode::Write {
                    fs::create_dir_all(&dest)
                        .with_context(|| format!("failed to create {}", dest.display()))?;
                }
                continue;
            }
            if !entry.file_type().is_file() {
                tracing::debug!("skipping non-regular file {}", entry.path().display());
                continue;
            }

            let changed = process_file(entry.path(), &dest, &rewriter, cfg, rules, report, mode)?;
            stats.files += 1;
            if changed > 0 {
                stats.files_changed += 1;
                stats.specifiers_changed += changed;
            }
        }
        stats.dirs += 1;
    }

    Ok(stats)
}

fn process_file(
    src: &Path,
    dest: &Path,
    rewriter: &Rewriter<'_>,
    cfg: &AppConfig,
    rules: &RuleSet,
    report: &mut ImportReport,
    mode: Mode,
) -> Result<usize> {
    let text =
        fs::read_to_string(src).with_context(|| format!("failed to read {}", src.display()))?;
    report.record_source(&text, rules, &cfg.externals);
    let rewritten = rewriter.rewrite(&text);
    tracing::debug!(
        file = %src.display(),
        changed = rewritten.changed,
        "rewrote imports"
    );
    if mode == Mode::Write {
        fs::write(dest, rewritten.text)
            .with_context(|| format!("failed to write {}", dest.display()))?;
    }
    Ok(rewritten.changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Exclude;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(root: &Path) -> AppConfig {
        AppConfig {
            source: root.join("registry/default"),
            out: root.join("src/default"),
            ..AppConfig::default()
        }
    }

    fn run(cfg: &AppConfig, mode: Mode) -> Result<(MirrorStats, ImportReport)> {
        let rules = RuleSet::default();
        let index = FileIndex::scan(&cfg.source, &cfg.dirs, &cfg.exclude);
        let mut report = ImportReport::new();
        let stats = mirror_tree(cfg, &rules, &index, &mut report, mode)?;
        Ok((stats, report))
    }

    #[test]
    fn mirrors_and_rewrites_tree() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        write(
            &cfg.source,
            "ui/button.tsx",
            "import * as React from \"react\"\nimport { cn } from \"@/lib/utils\"\n",
        );
        write(
            &cfg.source,
            "ui/dialog/dialog.tsx",
            "import {\n  Button,\n} from \"@/registry/default/ui/button\"\nimport { useMobile } from \"@/hooks/use-mobile\"\n",
        );
        write(&cfg.source, "lib/utils.ts", "import { clsx } from \"clsx\"\n");
        write(&cfg.source, "hooks/use-mobile.tsx", "import * as React from \"react\"\n");

        let (stats, report) = run(&cfg, Mode::Write).unwrap();
        assert_eq!(stats.dirs, 3);
        assert_eq!(stats.files, 4);
        assert_eq!(stats.files_changed, 2);
        assert_eq!(stats.specifiers_changed, 3);

        let dialog = fs::read_to_string(cfg.out.join("ui/dialog/dialog.tsx")).unwrap();
        assert_eq!(
            dialog,
            "import {\n  Button,\n} from \"@/default/ui/button.tsx\"\nimport { useMobile } from \"@/default/hooks/use-mobile.tsx\"\n"
        );
        let button = fs::read_to_string(cfg.out.join("ui/button.tsx")).unwrap();
        assert!(button.contains("from \"@/default/lib/utils.ts\""));
        assert!(button.contains("from \"react\""));
        assert!(cfg.out.join("lib/utils.ts").is_file());

        assert_eq!(report.count("react"), Some(2));
        assert_eq!(report.distinct(), 5);
    }

    #[test]
    fn missing_subdirectory_is_skipped() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        write(&cfg.source, "ui/card.tsx", "export const Card = 1\n");

        let (stats, _) = run(&cfg, Mode::Write).unwrap();
        assert_eq!(stats.dirs, 1);
        assert_eq!(stats.missing_dirs, 2);
        assert!(cfg.out.join("ui/card.tsx").is_file());
        assert!(!cfg.out.join("hooks").exists());
    }

    #[test]
    fn missing_source_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let err = run(&cfg, Mode::Write).unwrap_err();
        assert!(err.to_string().contains("source directory does not exist"));
    }

    #[test]
    fn unreadable_file_aborts() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        write(&cfg.source, "lib/a.ts", "export {}\n");
        let bad = cfg.source.join("lib/b.bin");
        fs::write(&bad, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let err = run(&cfg, Mode::Write).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
        // files before the failure stay written
        assert!(cfg.out.join("lib/a.ts").is_file());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        write(&cfg.source, "ui/badge.tsx", "import { cn } from \"@/lib/utils\"\n");

        let (stats, report) = run(&cfg, Mode::DryRun).unwrap();
        assert_eq!(stats.specifiers_changed, 1);
        assert_eq!(report.count("@/lib/utils"), Some(1));
        assert!(!cfg.out.exists());
    }

    #[test]
    fn excluded_files_are_not_copied() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(dir.path());
        cfg.exclude = Exclude::new(&["ui/**/*.md".to_string(), "ui/examples".to_string()]).unwrap();
        write(&cfg.source, "ui/card.tsx", "export {}\n");
        write(&cfg.source, "ui/notes/README.md", "import x from \"y\"\n");
        write(&cfg.source, "ui/examples/demo.tsx", "export {}\n");

        let (stats, report) = run(&cfg, Mode::Write).unwrap();
        assert_eq!(stats.files, 1);
        assert!(report.is_empty());
        assert!(!cfg.out.join("ui/notes/README.md").exists());
        assert!(!cfg.out.join("ui/examples").exists());
    }

    #[test]
    fn imports_of_excluded_files_fall_back_to_heuristic() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(dir.path());
        cfg.exclude = Exclude::new(&["ui/examples".to_string()]).unwrap();
        write(&cfg.source, "ui/examples/demo.ts", "export const demo = 1\n");
        write(
            &cfg.source,
            "ui/card.tsx",
            "import { demo } from \"@/registry/default/ui/examples/demo\"\n",
        );

        let (stats, _) = run(&cfg, Mode::Write).unwrap();
        assert_eq!(stats.files, 1);
        assert!(!cfg.out.join("ui/examples/demo.ts").exists());
        let card = fs::read_to_string(cfg.out.join("ui/card.tsx")).unwrap();
        assert_eq!(
            card,
            "import { demo } from \"@/default/ui/examples/demo.tsx\"\n"
        );
    }
}
