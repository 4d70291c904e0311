//! Evaluation session: the auditor's mutable record, one entry per rubric stage.
//!
//! A session can only come into existence in two ways: fresh from the rubric,
//! or from a list of stage evaluations that has been checked against it. Once
//! built, checklist lengths never change, so every evaluation stays paired
//! with its stage definition.

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, ShapeError};
use crate::rubric::{Rubric, StageDefinition, MAX_STAGE_SCORE};

/// Coerce a raw score string to its numeric contribution.
///
/// `"1"`..`"5"` count as themselves; empty, non-numeric and out-of-range
/// values count as 0. A hand-edited draft holding `"6"` still loads, but it
/// cannot push a stage above [`MAX_STAGE_SCORE`] or the total above the
/// rubric maximum.
pub fn score_value(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(v) if (1..=MAX_STAGE_SCORE).contains(&v) => v,
        _ => 0,
    }
}

/// Evaluation of a single stage.
///
/// This is also the persisted draft record, so the field names are part of
/// the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvaluation {
    key: String,
    #[serde(default)]
    open: bool,
    checks: Vec<bool>,
    #[serde(default)]
    score: String,
    #[serde(default)]
    comments: String,
}

impl StageEvaluation {
    /// A blank evaluation for `stage`.
    pub fn new(stage: &StageDefinition, open: bool) -> Self {
        Self {
            key: stage.key.to_string(),
            open,
            checks: vec![false; stage.criteria.len()],
            score: String::new(),
            comments: String::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the stage panel is expanded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn checks(&self) -> &[bool] {
        &self.checks
    }

    /// Raw score as entered; empty when unset.
    pub fn score(&self) -> &str {
        &self.score
    }

    /// Score coerced to 0..=5.
    pub fn score_value(&self) -> u32 {
        score_value(&self.score)
    }

    pub fn is_scored(&self) -> bool {
        self.score_value() > 0
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn completed_checks(&self) -> usize {
        self.checks.iter().filter(|&&c| c).count()
    }
}

/// The full evaluation across every stage, in rubric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EvaluationSession {
    stages: Vec<StageEvaluation>,
}

impl EvaluationSession {
    /// A fresh session: nothing checked, nothing scored, only the first
    /// stage expanded.
    pub fn fresh(rubric: &Rubric) -> Self {
        let stages = rubric
            .stages()
            .iter()
            .enumerate()
            .map(|(i, stage)| StageEvaluation::new(stage, i == 0))
            .collect();
        Self { stages }
    }

    /// Build a session from stage evaluations, checking that they line up
    /// with the rubric: same stage count, same key at each position, and a
    /// checklist of the right length for every stage.
    pub fn from_evaluations(
        rubric: &Rubric,
        stages: Vec<StageEvaluation>,
    ) -> Result<Self, ShapeError> {
        check_shape(rubric, &stages)?;
        Ok(Self { stages })
    }

    /// Re-check this session against `rubric`.
    pub fn validate(&self, rubric: &Rubric) -> Result<(), ShapeError> {
        check_shape(rubric, &self.stages)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StageEvaluation> {
        self.stages.get(index)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&StageEvaluation> {
        self.stages.iter().find(|s| s.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageEvaluation> {
        self.stages.iter()
    }

    /// Stage definitions paired with their evaluations, in order.
    pub fn paired<'a>(
        &'a self,
        rubric: &Rubric,
    ) -> impl Iterator<Item = (&'static StageDefinition, &'a StageEvaluation)> + 'a {
        rubric.stages().iter().zip(self.stages.iter())
    }

    pub(crate) fn toggle_open(&mut self, stage: usize) -> Result<(), SessionError> {
        let eval = self.stage_mut(stage)?;
        eval.open = !eval.open;
        Ok(())
    }

    pub(crate) fn set_check(
        &mut self,
        rubric: &Rubric,
        stage: usize,
        criterion: usize,
        value: bool,
    ) -> Result<(), SessionError> {
        let eval = self.stage_mut(stage)?;
        let len = eval.checks.len();
        let slot = eval.checks.get_mut(criterion).ok_or_else(|| {
            SessionError::CriterionOutOfRange {
                stage: rubric.stage(stage).map(|s| s.key).unwrap_or("?"),
                index: criterion,
                len,
            }
        })?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn set_score(&mut self, stage: usize, value: &str) -> Result<(), SessionError> {
        self.stage_mut(stage)?.score = value.to_string();
        Ok(())
    }

    pub(crate) fn set_comments(&mut self, stage: usize, text: &str) -> Result<(), SessionError> {
        self.stage_mut(stage)?.comments = text.to_string();
        Ok(())
    }

    fn stage_mut(&mut self, index: usize) -> Result<&mut StageEvaluation, SessionError> {
        let len = self.stages.len();
        self.stages
            .get_mut(index)
            .ok_or(SessionError::StageOutOfRange { index, len })
    }
}

impl<'a> IntoIterator for &'a EvaluationSession {
    type Item = &'a StageEvaluation;
    type IntoIter = std::slice::Iter<'a, StageEvaluation>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

fn check_shape(rubric: &Rubric, stages: &[StageEvaluation]) -> Result<(), ShapeError> {
    if stages.len() != rubric.len() {
        return Err(ShapeError::StageCount {
            expected: rubric.len(),
            found: stages.len(),
        });
    }

    for (position, (def, eval)) in rubric.stages().iter().zip(stages).enumerate() {
        if eval.key != def.key {
            return Err(ShapeError::KeyMismatch {
                position,
                expected: def.key,
                found: eval.key.clone(),
            });
        }
        if eval.checks.len() != def.criteria.len() {
            return Err(ShapeError::ChecklistLength {
                key: def.key,
                expected: def.criteria.len(),
                found: eval.checks.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_defaults() {
        let rubric = Rubric::standard();
        let session = EvaluationSession::fresh(&rubric);
        assert_eq!(session.len(), 7);
        for (i, (def, eval)) in session.paired(&rubric).enumerate() {
            assert_eq!(eval.key(), def.key);
            assert_eq!(eval.is_open(), i == 0);
            assert_eq!(eval.checks().len(), def.criteria.len());
            assert!(eval.checks().iter().all(|c| !c));
            assert_eq!(eval.score(), "");
            assert_eq!(eval.comments(), "");
        }
    }

    #[test]
    fn score_coercion() {
        for n in 1..=5u32 {
            assert_eq!(score_value(&n.to_string()), n);
        }
        assert_eq!(score_value(""), 0);
        assert_eq!(score_value("abc"), 0);
        assert_eq!(score_value("0"), 0);
        assert_eq!(score_value("6"), 0);
        assert_eq!(score_value("-2"), 0);
        assert_eq!(score_value(" 4 "), 4);
    }

    #[test]
    fn set_check_only_touches_target() {
        let rubric = Rubric::standard();
        let mut session = EvaluationSession::fresh(&rubric);
        let before = session.clone();

        session.set_check(&rubric, 2, 3, true).unwrap();

        assert!(session.get(2).unwrap().checks()[3]);
        for (i, (a, b)) in before.iter().zip(session.iter()).enumerate() {
            if i == 2 {
                for (j, (x, y)) in a.checks().iter().zip(b.checks()).enumerate() {
                    if j != 3 {
                        assert_eq!(x, y);
                    }
                }
            } else {
                assert_eq!(a, b);
            }
        }

        session.set_check(&rubric, 2, 3, false).unwrap();
        assert_eq!(session, before);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let rubric = Rubric::standard();
        let mut session = EvaluationSession::fresh(&rubric);
        assert!(matches!(
            session.toggle_open(7),
            Err(SessionError::StageOutOfRange { index: 7, len: 7 })
        ));
        assert!(matches!(
            session.set_check(&rubric, 1, 3, true),
            Err(SessionError::CriterionOutOfRange {
                stage: "objections-initiales",
                index: 3,
                len: 3
            })
        ));
        assert_eq!(session, EvaluationSession::fresh(&rubric));
    }

    #[test]
    fn shape_check_rejects_wrong_count() {
        let rubric = Rubric::standard();
        let mut stages: Vec<StageEvaluation> = EvaluationSession::fresh(&rubric).stages;
        stages.pop();
        assert_eq!(
            EvaluationSession::from_evaluations(&rubric, stages),
            Err(ShapeError::StageCount {
                expected: 7,
                found: 6
            })
        );
    }

    #[test]
    fn shape_check_rejects_swapped_stages() {
        let rubric = Rubric::standard();
        let mut stages = EvaluationSession::fresh(&rubric).stages;
        stages.swap(0, 1);
        let err = EvaluationSession::from_evaluations(&rubric, stages).unwrap_err();
        assert!(matches!(err, ShapeError::KeyMismatch { position: 0, .. }));
    }

    #[test]
    fn shape_check_rejects_wrong_checklist_length() {
        let rubric = Rubric::standard();
        let mut stages = EvaluationSession::fresh(&rubric).stages;
        stages[6].checks.push(true);
        let err = EvaluationSession::from_evaluations(&rubric, stages).unwrap_err();
        assert_eq!(
            err,
            ShapeError::ChecklistLength {
                key: "finalisation",
                expected: 6,
                found: 7
            }
        );
    }

    #[test]
    fn serializes_as_plain_array() {
        let rubric = Rubric::standard();
        let session = EvaluationSession::fresh(&rubric);
        let value = serde_json::to_value(&session).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 7);
        assert_eq!(array[0]["key"], "bienvenue");
        assert_eq!(array[0]["open"], true);
        assert_eq!(array[0]["score"], "");
        assert_eq!(array[1]["open"], false);
    }
}
