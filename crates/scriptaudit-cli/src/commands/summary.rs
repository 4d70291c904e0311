//! The `scriptaudit summary` command.

use std::path::PathBuf;

use anyhow::Result;

use scriptaudit_core::summary::Summary;
use scriptaudit_report::render_summary;

use super::load_draft;

pub fn execute(config_path: Option<PathBuf>, format: String) -> Result<()> {
    let loaded = load_draft(config_path.as_deref())?;
    let summary = Summary::compute(&loaded.rubric, &loaded.session());

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => println!("{}", render_summary(&summary)),
        other => anyhow::bail!("format inconnu: {other} (text ou json attendu)"),
    }

    Ok(())
}
