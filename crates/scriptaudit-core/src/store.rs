//! The evaluation state store.
//!
//! Holds the current session as an immutable snapshot behind an `Arc`. Each
//! mutation is applied to a private copy and published whole, so a reader
//! holding an earlier snapshot keeps seeing the complete old state.

use std::sync::Arc;

use crate::error::SessionError;
use crate::rubric::Rubric;
use crate::session::EvaluationSession;
use crate::summary::Summary;

/// Current session plus the rubric it is shaped after.
#[derive(Debug, Clone)]
pub struct EvaluationStore {
    rubric: Rubric,
    current: Arc<EvaluationSession>,
}

impl EvaluationStore {
    /// Start with a fresh session.
    pub fn new(rubric: Rubric) -> Self {
        let current = Arc::new(EvaluationSession::fresh(&rubric));
        Self { rubric, current }
    }

    /// Start from an already validated session.
    pub fn with_session(rubric: Rubric, session: EvaluationSession) -> Result<Self, SessionError> {
        session.validate(&rubric)?;
        Ok(Self {
            rubric,
            current: Arc::new(session),
        })
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// The current snapshot. Later mutations never change it.
    pub fn snapshot(&self) -> Arc<EvaluationSession> {
        Arc::clone(&self.current)
    }

    /// Borrow the current session without taking a snapshot.
    pub fn session(&self) -> &EvaluationSession {
        &self.current
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.rubric, &self.current)
    }

    pub fn toggle_open(&mut self, stage: usize) -> Result<(), SessionError> {
        self.mutate(|s, _| s.toggle_open(stage))
    }

    pub fn set_check(
        &mut self,
        stage: usize,
        criterion: usize,
        value: bool,
    ) -> Result<(), SessionError> {
        self.mutate(|s, rubric| s.set_check(rubric, stage, criterion, value))
    }

    /// Store a raw score string. Any text is accepted here; aggregation and
    /// export coerce it.
    pub fn set_score(&mut self, stage: usize, value: &str) -> Result<(), SessionError> {
        self.mutate(|s, _| s.set_score(stage, value))
    }

    pub fn set_comments(&mut self, stage: usize, text: &str) -> Result<(), SessionError> {
        self.mutate(|s, _| s.set_comments(stage, text))
    }

    /// Replace the whole session. Rejected, with the state left untouched,
    /// unless it lines up with the rubric.
    pub fn load_session(&mut self, session: EvaluationSession) -> Result<(), SessionError> {
        session.validate(&self.rubric)?;
        self.current = Arc::new(session);
        Ok(())
    }

    /// Apply `f` to a private copy and publish it only if `f` succeeds.
    fn mutate<F>(&mut self, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut EvaluationSession, &Rubric) -> Result<(), SessionError>,
    {
        let mut next = (*self.current).clone();
        f(&mut next, &self.rubric)?;
        match Arc::get_mut(&mut self.current) {
            Some(slot) => *slot = next,
            None => self.current = Arc::new(next),
        }
        Ok(())
    }
}

impl Default for EvaluationStore {
    fn default() -> Self {
        Self::new(Rubric::standard())
    }
}
