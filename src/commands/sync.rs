use crate::config::{AppConfig, Overrides};
use crate::imports::RuleSet;
use crate::index::FileIndex;
use crate::mirror::{MirrorStats, Mode, mirror_tree};
use crate::report::ImportReport;
use anyhow::{Context, Result};
use std::path::Path;

/// Execute the sync command
pub fn sync(config: Option<&str>, overrides: &Overrides, json: bool) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new))
        .context("failed to load config")?
        .with_overrides(overrides);
    let (stats, report) = run_sync(&cfg)?;
    tracing::info!(
        "sync complete: {} files copied, {} rewritten ({} specifiers)",
        stats.files,
        stats.files_changed,
        stats.specifiers_changed
    );
    super::print_report(&report, json)
}

/// Build the index over the whole source tree, then mirror it.
pub fn run_sync(cfg: &AppConfig) -> Result<(MirrorStats, ImportReport)> {
    tracing::info!(
        source = %cfg.source.display(),
        out = %cfg.out.display(),
        rewrite_externals = cfg.externals.rewrite,
        "sync start"
    );
    let rules = RuleSet::default();
    let index = FileIndex::scan(&cfg.source, &cfg.dirs, &cfg.exclude);
    tracing::info!("indexed {} files", index.len());

    let mut report = ImportReport::new();
    let stats = mirror_tree(cfg, &rules, &index, &mut report, Mode::Write)
        .context("sync failed")?;
    Ok((stats, report))
}
