use crate::config::{AppConfig, Overrides};
use crate::imports::RuleSet;
use crate::index::FileIndex;
use crate::mirror::{MirrorStats, Mode, mirror_tree};
use crate::report::ImportReport;
use anyhow::{Context, Result};
use std::path::Path;

/// Execute the scan command: index and report without writing anything
pub fn scan(config: Option<&str>, overrides: &Overrides, json: bool) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new))
        .context("failed to load config")?
        .with_overrides(overrides);
    let (stats, report) = run_scan(&cfg)?;
    tracing::info!(
        "scan complete: {} files, {} would change ({} specifiers)",
        stats.files,
        stats.files_changed,
        stats.specifiers_changed
    );
    super::print_report(&report, json)
}

pub fn run_scan(cfg: &AppConfig) -> Result<(MirrorStats, ImportReport)> {
    let rules = RuleSet::default();
    let index = FileIndex::scan(&cfg.source, &cfg.dirs, &cfg.exclude);
    let mut report = ImportReport::new();
    let stats = mirror_tree(cfg, &rules, &index, &mut report, Mode::DryRun)
        .context("scan failed")?;
    Ok((stats, report))
}
