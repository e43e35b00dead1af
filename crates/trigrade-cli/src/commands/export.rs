//! The `trigrade export` command.

use std::path::PathBuf;

use anyhow::Result;

use trigrade_report::export::export_csv;
use trigrade_report::html::write_html_report;

use super::{GlobalOpts, Workspace};

pub fn execute(
    opts: &GlobalOpts,
    output: Option<PathBuf>,
    format: String,
    no_bom: bool,
) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let session = ws.open()?;
    let output = output.unwrap_or_else(|| ws.config.output_dir.clone());
    let bom = ws.config.export.bom && !no_bom;

    let formats: Vec<&str> = if format == "all" {
        vec!["csv", "json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    let mut written = Vec::new();
    for fmt in formats {
        match fmt {
            "csv" => written.extend(export_csv(&session, &output, bom)?),
            "json" => {
                let path = output.join("session.json");
                session.save(&path)?;
                written.push(path);
            }
            "html" => {
                let path = output.join("report.html");
                write_html_report(&session, &path)?;
                written.push(path);
            }
            other => anyhow::bail!("unknown export format: {other} (expected csv, json, html, all)"),
        }
    }

    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
