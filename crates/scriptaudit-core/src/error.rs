//! Session error types.
//!
//! I/O failures travel as `anyhow::Error`; these cover the cases where a
//! caller hands the session something that does not fit the rubric.

use thiserror::Error;

/// A mutation addressed a stage or criterion that does not exist.
///
/// Indices are stored 0-based and displayed 1-based, as numbered on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("étape {} hors limites (la grille compte {len} étapes)", .index + 1)]
    StageOutOfRange { index: usize, len: usize },

    #[error("critère {} hors limites pour l'étape '{stage}' ({len} critères)", .index + 1)]
    CriterionOutOfRange {
        stage: &'static str,
        index: usize,
        len: usize,
    },

    /// A replacement session did not match the rubric.
    #[error("session refusée: {0}")]
    Shape(#[from] ShapeError),
}

/// A list of stage evaluations does not line up with the rubric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{expected} étapes attendues, {found} trouvées")]
    StageCount { expected: usize, found: usize },

    #[error("l'étape {} devrait être '{expected}', trouvé '{found}'", .position + 1)]
    KeyMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("l'étape '{key}' devrait avoir {expected} critères, {found} trouvés")]
    ChecklistLength {
        key: &'static str,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_display_as_numbered_on_screen() {
        let err = SessionError::StageOutOfRange { index: 7, len: 7 };
        assert_eq!(
            err.to_string(),
            "étape 8 hors limites (la grille compte 7 étapes)"
        );

        let err = SessionError::CriterionOutOfRange {
            stage: "objections-initiales",
            index: 3,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "critère 4 hors limites pour l'étape 'objections-initiales' (3 critères)"
        );
    }

    #[test]
    fn shape_errors_wrap_into_session_errors() {
        let err: SessionError = ShapeError::StageCount {
            expected: 7,
            found: 0,
        }
        .into();
        assert_eq!(err.to_string(), "session refusée: 7 étapes attendues, 0 trouvées");
    }
}
