mod clean;
mod scan;
mod sync;

pub use clean::clean;
pub use scan::{run_scan, scan};
pub use sync::{run_sync, sync};

use crate::report::ImportReport;
use anyhow::{Context, Result};

fn print_report(report: &ImportReport, json: bool) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(&report.to_json()).context("failed to encode report")?;
        println!("{}", text);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
