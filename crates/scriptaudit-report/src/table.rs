//! Summary and rubric tables.

use comfy_table::{Cell, Table};

use scriptaudit_core::rubric::Rubric;
use scriptaudit_core::summary::Summary;

const BAR_WIDTH: usize = 20;

/// `[########------------] 40%`
pub fn progress_bar(completed: usize, total: usize) -> String {
    let total = total.max(1);
    let filled = (completed * BAR_WIDTH / total).min(BAR_WIDTH);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        completed * 100 / total
    )
}

/// The "Résumé" block: total score, checklist completion, remaining items.
pub fn render_summary(summary: &Summary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Résumé", ""]);
    table.add_row(vec![
        Cell::new("Score total"),
        Cell::new(format!("{} / {}", summary.total_score, summary.max_score)),
    ]);
    table.add_row(vec![
        Cell::new("Checklist complétée"),
        Cell::new(format!(
            "{} / {} {}",
            summary.completed_checks,
            summary.total_checks,
            progress_bar(summary.completed_checks, summary.total_checks)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Items restants"),
        Cell::new(summary.remaining_checks),
    ]);
    table.to_string()
}

/// Overview of the rubric: one row per stage, then its criteria.
pub fn render_rubric(rubric: &Rubric) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Clé", "Étape", "Critères"]);
    for (i, stage) in rubric.stages().iter().enumerate() {
        let criteria = stage
            .criteria
            .iter()
            .enumerate()
            .map(|(j, c)| format!("{}. {c}", j + 1))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(stage.key),
            Cell::new(stage.title),
            Cell::new(criteria),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptaudit_core::session::EvaluationSession;

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0, 30), "[--------------------] 0%");
        assert_eq!(progress_bar(12, 30), "[########------------] 40%");
        assert_eq!(progress_bar(30, 30), "[####################] 100%");
        assert_eq!(progress_bar(0, 0), "[--------------------] 0%");
    }

    #[test]
    fn summary_table_contents() {
        let rubric = Rubric::standard();
        let summary = Summary::compute(&rubric, &EvaluationSession::fresh(&rubric));
        let out = render_summary(&summary);
        assert!(out.contains("Score total"));
        assert!(out.contains("0 / 35"));
        assert!(out.contains("0 / 30"));
        assert!(out.contains("Items restants"));
        assert!(out.contains("30"));
    }

    #[test]
    fn rubric_table_lists_every_stage() {
        let out = render_rubric(&Rubric::standard());
        for key in [
            "bienvenue",
            "objections-initiales",
            "besoins",
            "produit",
            "cures",
            "prix-objections",
            "finalisation",
        ] {
            assert!(out.contains(key), "missing {key}");
        }
        assert!(out.contains("6. Satisfaction renforcée"));
    }
}
