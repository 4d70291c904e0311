//! The `scriptaudit export` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use scriptaudit_core::export::ExportDocument;

use super::{load_draft, outcome_note};

pub fn execute(config_path: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let loaded = load_draft(config_path.as_deref())?;
    if let Some(note) = outcome_note(&loaded.outcome) {
        eprintln!("{note}");
    }

    let session = loaded.session();
    let doc = ExportDocument::build(&loaded.rubric, &session, Utc::now());
    let dir = output.unwrap_or_else(|| loaded.config.export_dir.clone());
    let path = doc.write_to_dir(&dir)?;

    println!("Exporté: {}", path.display());
    Ok(())
}
