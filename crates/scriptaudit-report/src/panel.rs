//! Collapsible stage panels.

use scriptaudit_core::rubric::{Rubric, StageDefinition};
use scriptaudit_core::session::{EvaluationSession, StageEvaluation};
use scriptaudit_core::summary::StageProgress;

const OPEN_MARKER: &str = "▾";
const CLOSED_MARKER: &str = "▸";
const UNSET_SCORE: &str = "—";
const INDENT: &str = "    ";

/// Which panels to draw expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Follow each stage's `open` flag.
    AsStored,
    /// Expand every stage.
    All,
}

/// Render one stage panel.
///
/// Example output for an open stage:
/// ```text
/// ▾ 1. Bienvenue & Confirmation
///     Checklist: 1/4 · Score: 4/5
///     Liste de vérification
///       [x] 1. Accueil personnalisé
///       [ ] 2. Présentation
///       ...
///     Score: 4 (1 = faible, 5 = excellent)
///     Commentaires:
///       Bon accueil
/// ```
pub fn render_stage_card(
    number: usize,
    stage: &StageDefinition,
    eval: &StageEvaluation,
    expanded: bool,
) -> String {
    let progress = StageProgress::of(stage, eval);
    let score = progress
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNSET_SCORE.to_string());

    let mut out = String::new();
    let marker = if expanded { OPEN_MARKER } else { CLOSED_MARKER };
    out.push_str(&format!("{marker} {number}. {}\n", stage.title));
    out.push_str(&format!(
        "{INDENT}Checklist: {}/{} · Score: {score}/{}\n",
        progress.completed, progress.total, progress.max_score
    ));

    if !expanded {
        return out;
    }

    out.push_str(&format!("{INDENT}Liste de vérification\n"));
    for (i, (label, checked)) in stage.criteria.iter().zip(eval.checks()).enumerate() {
        let mark = if *checked { "x" } else { " " };
        out.push_str(&format!("{INDENT}  [{mark}] {}. {label}\n", i + 1));
    }

    out.push_str(&format!(
        "{INDENT}Score: {score} (1 = faible, 5 = excellent)\n"
    ));

    out.push_str(&format!("{INDENT}Commentaires:\n"));
    if eval.comments().trim().is_empty() {
        out.push_str(&format!("{INDENT}  (aucun commentaire)\n"));
    } else {
        for line in eval.comments().lines() {
            out.push_str(&format!("{INDENT}  {line}\n"));
        }
    }

    out
}

/// Render every stage panel in rubric order, separated by blank lines.
pub fn render_session(rubric: &Rubric, session: &EvaluationSession, expansion: Expansion) -> String {
    session
        .paired(rubric)
        .enumerate()
        .map(|(i, (stage, eval))| {
            let expanded = match expansion {
                Expansion::AsStored => eval.is_open(),
                Expansion::All => true,
            };
            render_stage_card(i + 1, stage, eval, expanded)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
