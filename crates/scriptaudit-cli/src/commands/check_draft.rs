//! The `scriptaudit check-draft` command.

use std::path::PathBuf;

use anyhow::Result;

use scriptaudit_core::persistence::LoadOutcome;
use scriptaudit_core::summary::Summary;

use super::load_draft;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let loaded = load_draft(config_path.as_deref())?;
    let path = loaded.config.draft_path();

    match &loaded.outcome {
        LoadOutcome::Loaded(session) => {
            let summary = Summary::compute(&loaded.rubric, session);
            println!(
                "Brouillon valide: {} ({}/{} critères, score {}/{})",
                path.display(),
                summary.completed_checks,
                summary.total_checks,
                summary.total_score,
                summary.max_score
            );
        }
        LoadOutcome::Absent => println!("Aucun brouillon dans {}", path.display()),
        LoadOutcome::Invalid(reason) => {
            println!("Brouillon invalide: {} ({reason})", path.display());
            println!("Il sera ignoré et une nouvelle évaluation commencera.");
        }
    }

    Ok(())
}
