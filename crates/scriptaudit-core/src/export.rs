//! Export document: a denormalized, self-contained snapshot of a session.
//!
//! Field names follow the published export schema (French keys), hence the
//! serde renames.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::rubric::Rubric;
use crate::session::EvaluationSession;
use crate::summary::Summary;

/// Application name written into every export.
pub const APPLICATION_NAME: &str = "Table d’Évaluation de Script";

/// Prefix of export file names.
pub const EXPORT_FILE_PREFIX: &str = "audit-evaluation";

/// Suffixes tried before giving up on finding a free export name.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// The exported report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub stages: Vec<ExportStage>,
    #[serde(rename = "resume")]
    pub summary: ExportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMeta {
    /// ISO-8601 UTC timestamp with milliseconds.
    #[serde(rename = "creeLe")]
    pub created_at: String,
    pub application: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStage {
    /// 1-based stage number.
    #[serde(rename = "etape")]
    pub number: usize,
    #[serde(rename = "cle")]
    pub key: String,
    #[serde(rename = "titre")]
    pub title: String,
    pub checklist: Vec<ExportCheck>,
    /// Coerced score, 0 when unset.
    pub score: u32,
    #[serde(rename = "commentaires")]
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCheck {
    #[serde(rename = "libelle")]
    pub label: String,
    #[serde(rename = "coche")]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    #[serde(rename = "scoreTotal")]
    pub score_total: u32,
    #[serde(rename = "scoreMax")]
    pub score_max: u32,
    pub checklist: ExportChecklistSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportChecklistSummary {
    pub complete: usize,
    pub total: usize,
    #[serde(rename = "restant")]
    pub remaining: usize,
}

impl ExportDocument {
    /// Build the document. Reads the session, never changes it.
    pub fn build(rubric: &Rubric, session: &EvaluationSession, created_at: DateTime<Utc>) -> Self {
        let stages = session
            .paired(rubric)
            .enumerate()
            .map(|(i, (def, eval))| ExportStage {
                number: i + 1,
                key: def.key.to_string(),
                title: def.title.to_string(),
                checklist: def
                    .criteria
                    .iter()
                    .zip(eval.checks())
                    .map(|(label, &checked)| ExportCheck {
                        label: label.to_string(),
                        checked,
                    })
                    .collect(),
                score: eval.score_value(),
                comments: eval.comments().to_string(),
            })
            .collect();

        let summary = Summary::compute(rubric, session);

        Self {
            meta: ExportMeta {
                created_at: iso_timestamp(created_at),
                application: APPLICATION_NAME.to_string(),
            },
            stages,
            summary: ExportSummary {
                score_total: summary.total_score,
                score_max: summary.max_score,
                checklist: ExportChecklistSummary {
                    complete: summary.completed_checks,
                    total: summary.total_checks,
                    remaining: summary.remaining_checks,
                },
            },
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("sérialisation de l'export impossible")
    }

    /// File name derived from `meta.creeLe`.
    pub fn file_name(&self) -> String {
        file_name_for_stamp(&self.meta.created_at)
    }

    /// Write the document into `dir` under its timestamped file name and
    /// return the full path.
    ///
    /// The file appears whole or not at all. An existing export is never
    /// replaced: if the name is taken, `-1`, `-2`, ... is appended before
    /// `.json`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let json = self.to_json_pretty()?;
        std::fs::create_dir_all(dir).with_context(|| {
            format!("impossible de créer le répertoire d'export {}", dir.display())
        })?;

        let mut tmp = NamedTempFile::new_in(dir).with_context(|| {
            format!("impossible de créer un fichier temporaire dans {}", dir.display())
        })?;
        tmp.write_all(json.as_bytes())
            .context("écriture de l'export impossible")?;

        let base = self.file_name();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(numbered_file_name(&base, attempt));
            match tmp.persist_noclobber(&path) {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "export written");
                    return Ok(path);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => {
                    return Err(e.error).with_context(|| {
                        format!("impossible d'écrire l'export {}", path.display())
                    })
                }
            }
        }
        anyhow::bail!(
            "aucun nom libre pour {base} dans {} après {MAX_NAME_ATTEMPTS} essais",
            dir.display()
        )
    }

    /// Load a previously written export.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("impossible de lire l'export {}", path.display()))?;
        serde_json::from_str(&content).context("export JSON invalide")
    }
}

/// `audit-evaluation-YYYY-MM-DDTHH-MM-SS.json`: the ISO timestamp cut to
/// seconds, with colons replaced so it is a valid file name everywhere.
pub fn export_file_name(created_at: DateTime<Utc>) -> String {
    file_name_for_stamp(&iso_timestamp(created_at))
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn file_name_for_stamp(stamp: &str) -> String {
    let seconds = stamp.get(..19).unwrap_or(stamp);
    format!("{EXPORT_FILE_PREFIX}-{}.json", seconds.replace(':', "-"))
}

/// `base` for the first attempt, then `stem-n.json`.
fn numbered_file_name(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    match base.strip_suffix(".json") {
        Some(stem) => format!("{stem}-{attempt}.json"),
        None => format!("{base}-{attempt}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EvaluationStore;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, m, s).unwrap()
            + chrono::Duration::milliseconds(ms as i64)
    }

    fn sample_store() -> EvaluationStore {
        let mut store = EvaluationStore::default();
        store.set_check(0, 0, true).unwrap();
        store.set_check(0, 3, true).unwrap();
        store.set_check(6, 5, true).unwrap();
        store.set_score(0, "4").unwrap();
        store.set_score(1, "").unwrap();
        store.set_score(6, "2").unwrap();
        store.set_comments(0, "Accueil chaleureux").unwrap();
        store
    }

    #[test]
    fn file_name_is_filesystem_safe() {
        assert_eq!(
            export_file_name(at(9, 5, 7, 431)),
            "audit-evaluation-2025-03-14T09-05-07.json"
        );
    }

    #[test]
    fn meta_timestamp_is_iso_with_millis() {
        let store = EvaluationStore::default();
        let doc = ExportDocument::build(store.rubric(), store.session(), at(9, 5, 7, 431));
        assert_eq!(doc.meta.created_at, "2025-03-14T09:05:07.431Z");
        assert_eq!(doc.meta.application, APPLICATION_NAME);
    }

    #[test]
    fn stages_mirror_rubric_and_session() {
        let store = sample_store();
        let doc = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 0));

        assert_eq!(doc.stages.len(), 7);
        for (i, (stage, def)) in doc.stages.iter().zip(store.rubric().stages()).enumerate() {
            assert_eq!(stage.number, i + 1);
            assert_eq!(stage.key, def.key);
            assert_eq!(stage.title, def.title);
            assert_eq!(stage.checklist.len(), def.criteria.len());
        }

        let first = &doc.stages[0];
        assert_eq!(first.checklist[0].label, "Accueil personnalisé");
        let checked: Vec<bool> = first.checklist.iter().map(|c| c.checked).collect();
        assert_eq!(checked, vec![true, false, false, true]);
        assert_eq!(first.score, 4);
        assert_eq!(first.comments, "Accueil chaleureux");
        assert_eq!(doc.stages[1].score, 0);
        assert_eq!(doc.stages[6].score, 2);
    }

    #[test]
    fn summary_block_matches_aggregation() {
        let store = sample_store();
        let doc = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 0));
        let summary = store.summary();

        assert_eq!(doc.summary.score_total, summary.total_score);
        assert_eq!(doc.summary.score_total, 6);
        assert_eq!(doc.summary.score_max, 35);
        assert_eq!(doc.summary.checklist.complete, 3);
        assert_eq!(doc.summary.checklist.total, 30);
        assert_eq!(doc.summary.checklist.remaining, 27);
    }

    #[test]
    fn json_uses_export_field_names() {
        let store = sample_store();
        let doc = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 0));
        let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["meta"]["creeLe"], "2025-03-14T10:00:00.000Z");
        assert_eq!(value["stages"][0]["etape"], 1);
        assert_eq!(value["stages"][0]["cle"], "bienvenue");
        assert_eq!(value["stages"][0]["titre"], "Bienvenue & Confirmation");
        assert_eq!(value["stages"][0]["checklist"][0]["coche"], true);
        assert_eq!(
            value["stages"][0]["checklist"][1]["libelle"],
            "Présentation"
        );
        assert_eq!(value["stages"][0]["commentaires"], "Accueil chaleureux");
        assert_eq!(value["resume"]["scoreTotal"], 6);
        assert_eq!(value["resume"]["scoreMax"], 35);
        assert_eq!(value["resume"]["checklist"]["restant"], 27);
        assert!(value["stages"][0].get("open").is_none());
    }

    #[test]
    fn export_is_a_pure_read() {
        let store = sample_store();
        let before = store.snapshot();

        let first = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 0));
        let second = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 1, 250));

        assert_eq!(*store.snapshot(), *before);
        assert_ne!(first.meta.created_at, second.meta.created_at);
        assert_eq!(first.stages, second.stages);
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.meta.application, second.meta.application);
    }

    #[test]
    fn write_to_dir_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let store = sample_store();
        let created = at(16, 45, 30, 0);
        let doc = ExportDocument::build(store.rubric(), store.session(), created);

        let path = doc.write_to_dir(&out).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "audit-evaluation-2025-03-14T16-45-30.json"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"meta\""));
        assert_eq!(ExportDocument::load_json(&path).unwrap(), doc);
    }

    #[test]
    fn same_second_exports_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = sample_store();
        let first = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 100));
        store.set_score(3, "5").unwrap();
        let second = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 500));
        let third = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 900));

        let p1 = first.write_to_dir(dir.path()).unwrap();
        let p2 = second.write_to_dir(dir.path()).unwrap();
        let p3 = third.write_to_dir(dir.path()).unwrap();

        let name = |p: &PathBuf| p.file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(name(&p1), "audit-evaluation-2025-03-14T10-00-00.json");
        assert_eq!(name(&p2), "audit-evaluation-2025-03-14T10-00-00-1.json");
        assert_eq!(name(&p3), "audit-evaluation-2025-03-14T10-00-00-2.json");

        assert_eq!(ExportDocument::load_json(&p1).unwrap(), first);
        assert_eq!(ExportDocument::load_json(&p2).unwrap(), second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn write_into_a_file_path_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("pas-un-dossier");
        std::fs::write(&blocker, "x").unwrap();
        let store = sample_store();
        let doc = ExportDocument::build(store.rubric(), store.session(), at(10, 0, 0, 0));

        assert!(doc.write_to_dir(&blocker).is_err());
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "x");
    }

    #[test]
    fn numbered_names_insert_before_extension() {
        assert_eq!(numbered_file_name("a.json", 0), "a.json");
        assert_eq!(numbered_file_name("a.json", 3), "a-3.json");
    }
}
