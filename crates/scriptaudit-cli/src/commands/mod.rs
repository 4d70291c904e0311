//! Subcommand implementations.

use std::path::Path;

use anyhow::Result;

use scriptaudit_core::config::{load_config_from, AuditConfig};
use scriptaudit_core::persistence::LoadOutcome;
use scriptaudit_core::rubric::Rubric;
use scriptaudit_core::session::EvaluationSession;

pub mod check_draft;
pub mod edit;
pub mod export;
pub mod init;
pub mod rubric;
pub mod show;
pub mod summary;

/// Config plus the draft loaded through it.
pub(crate) struct Loaded {
    pub config: AuditConfig,
    pub rubric: Rubric,
    pub outcome: LoadOutcome,
}

impl Loaded {
    /// Resolve the outcome to a session, fresh unless a valid draft was read.
    pub fn session(&self) -> EvaluationSession {
        self.outcome.clone().into_session(&self.rubric)
    }
}

pub(crate) fn load_draft(config_path: Option<&Path>) -> Result<Loaded> {
    let config = load_config_from(config_path)?;
    let rubric = Rubric::standard();
    let outcome = config.persistence(rubric).load();
    Ok(Loaded {
        config,
        rubric,
        outcome,
    })
}

/// One-line note about where the session came from, `None` when nothing
/// was stored.
pub(crate) fn outcome_note(outcome: &LoadOutcome) -> Option<String> {
    match outcome {
        LoadOutcome::Loaded(_) => Some("Brouillon chargé.".to_string()),
        LoadOutcome::Absent => None,
        LoadOutcome::Invalid(reason) => Some(format!(
            "Brouillon ignoré ({reason}); nouvelle évaluation."
        )),
    }
}
