//! Aggregate counters derived from a session.

use serde::{Deserialize, Serialize};

use crate::rubric::{Rubric, StageDefinition, MAX_STAGE_SCORE};
use crate::session::{EvaluationSession, StageEvaluation};

/// Checklist completion and score totals for a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_checks: usize,
    pub completed_checks: usize,
    pub remaining_checks: usize,
    /// Sum of stage scores, unset stages counting 0.
    pub total_score: u32,
    pub max_score: u32,
}

impl Summary {
    /// Compute the summary. Pure: same inputs, same counters.
    pub fn compute(rubric: &Rubric, session: &EvaluationSession) -> Self {
        let total_checks = rubric.total_criteria();
        let completed_checks = session.iter().map(|s| s.completed_checks()).sum();
        let total_score = session.iter().map(|s| s.score_value()).sum();

        Self {
            total_checks,
            completed_checks,
            remaining_checks: total_checks.saturating_sub(completed_checks),
            total_score,
            max_score: rubric.max_score(),
        }
    }

    /// Checklist completion as a whole percentage, 0 for an empty rubric.
    pub fn completion_percent(&self) -> usize {
        self.completed_checks * 100 / self.total_checks.max(1)
    }
}

/// Progress of a single stage, shown in its panel header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub completed: usize,
    pub total: usize,
    /// Coerced score, `None` while unset.
    pub score: Option<u32>,
    pub max_score: u32,
}

impl StageProgress {
    pub fn of(stage: &StageDefinition, eval: &StageEvaluation) -> Self {
        let value = eval.score_value();
        Self {
            completed: eval.completed_checks(),
            total: stage.criteria.len(),
            score: (value > 0).then_some(value),
            max_score: MAX_STAGE_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EvaluationStore;

    #[test]
    fn fresh_session_summary() {
        let rubric = Rubric::standard();
        let summary = Summary::compute(&rubric, &EvaluationSession::fresh(&rubric));
        assert_eq!(
            summary,
            Summary {
                total_checks: 30,
                completed_checks: 0,
                remaining_checks: 30,
                total_score: 0,
                max_score: 35,
            }
        );
        assert_eq!(summary.completion_percent(), 0);
    }

    #[test]
    fn worked_example() {
        let mut store = EvaluationStore::default();

        // 12 checks spread across stages: 2+1+3+0+2+1+3
        let checks: &[(usize, &[usize])] = &[
            (0, &[0, 1]),
            (1, &[2]),
            (2, &[0, 2, 4]),
            (4, &[1, 3]),
            (5, &[0]),
            (6, &[0, 3, 5]),
        ];
        for (stage, criteria) in checks {
            for &c in *criteria {
                store.set_check(*stage, c, true).unwrap();
            }
        }
        for (stage, score) in ["3", "", "5", "2", "4", "1", "3"].iter().enumerate() {
            store.set_score(stage, score).unwrap();
        }

        let summary = store.summary();
        assert_eq!(summary.total_checks, 30);
        assert_eq!(summary.completed_checks, 12);
        assert_eq!(summary.remaining_checks, 18);
        assert_eq!(summary.total_score, 18);
        assert_eq!(summary.max_score, 35);
        assert_eq!(summary.completion_percent(), 40);
    }

    #[test]
    fn compute_is_idempotent() {
        let mut store = EvaluationStore::default();
        store.set_check(3, 2, true).unwrap();
        store.set_score(3, "4").unwrap();

        let snapshot = store.snapshot();
        let first = Summary::compute(store.rubric(), &snapshot);
        let second = Summary::compute(store.rubric(), &snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn each_score_contributes_its_value() {
        for n in 1..=5u32 {
            let mut store = EvaluationStore::default();
            store.set_score(2, &n.to_string()).unwrap();
            assert_eq!(store.summary().total_score, n);
        }

        let mut store = EvaluationStore::default();
        store.set_score(2, "5").unwrap();
        store.set_score(2, "").unwrap();
        assert_eq!(store.summary().total_score, 0);
    }

    #[test]
    fn stage_progress_reports_unset_score_as_none() {
        let mut store = EvaluationStore::default();
        store.set_check(1, 0, true).unwrap();
        let rubric = *store.rubric();

        let progress = StageProgress::of(&rubric.stages()[1], store.session().get(1).unwrap());
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.score, None);

        store.set_score(1, "2").unwrap();
        let progress = StageProgress::of(&rubric.stages()[1], store.session().get(1).unwrap());
        assert_eq!(progress.score, Some(2));
    }
}
