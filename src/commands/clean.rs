use crate::config::{AppConfig, Overrides};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Execute the clean command
pub fn clean(config: Option<&str>, overrides: &Overrides, yes: bool) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new))
        .context("failed to load config")?
        .with_overrides(overrides);
    remove_output(&cfg.out, yes)
}

fn remove_output(out: &Path, yes: bool) -> Result<()> {
    if out.exists() {
        if !yes {
            bail!("refusing to remove {} without --yes", out.display());
        }
        tracing::info!("removing {}", out.display());
        fs::remove_dir_all(out).with_context(|| format!("failed to remove {}", out.display()))?;
    } else {
        tracing::debug!("{} does not exist, nothing to clean", out.display());
    }
    Ok(())
}
