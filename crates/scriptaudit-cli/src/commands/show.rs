//! The `scriptaudit show` command.

use std::path::PathBuf;

use anyhow::Result;

use scriptaudit_core::summary::Summary;
use scriptaudit_report::{render_session, render_summary, Expansion};

use super::{load_draft, outcome_note};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let loaded = load_draft(config_path.as_deref())?;
    if let Some(note) = outcome_note(&loaded.outcome) {
        println!("{note}");
    }

    let session = loaded.session();
    println!("{}", render_session(&loaded.rubric, &session, Expansion::All));
    println!(
        "{}",
        render_summary(&Summary::compute(&loaded.rubric, &session))
    );

    Ok(())
}
