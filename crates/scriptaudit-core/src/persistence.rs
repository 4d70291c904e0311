//! Draft persistence over a key-value storage port.
//!
//! The draft is the whole session serialized as one JSON value under a fixed
//! key. Saving is explicit and overwrites; loading never fails: anything that
//! cannot be turned back into a session matching the rubric is reported as
//! [`LoadOutcome::Invalid`] and the caller starts fresh.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::rubric::Rubric;
use crate::session::{EvaluationSession, StageEvaluation};

/// Key the draft is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "audit-evaluation";

/// A string key-value store.
pub trait KeyValueStorage {
    /// Read the value under `key`, `None` if nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so readers see either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("impossible de lire {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("impossible de créer {}", self.dir.display()))?;

        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("impossible de créer un fichier temporaire dans {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())
            .context("écriture du brouillon impossible")?;
        tmp.persist(&path)
            .with_context(|| format!("impossible d'écrire {}", path.display()))?;
        Ok(())
    }
}

/// In-memory storage, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What loading the draft produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(EvaluationSession),
    /// Nothing stored under the key.
    Absent,
    /// Something was stored but could not be used.
    Invalid(String),
}

impl LoadOutcome {
    /// The loaded session, or a fresh one.
    pub fn into_session(self, rubric: &Rubric) -> EvaluationSession {
        match self {
            LoadOutcome::Loaded(session) => session,
            LoadOutcome::Absent | LoadOutcome::Invalid(_) => EvaluationSession::fresh(rubric),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Saves and loads the draft under one key of a [`KeyValueStorage`].
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    storage: S,
    key: String,
    rubric: Rubric,
}

impl<S: KeyValueStorage> Persistence<S> {
    pub fn new(storage: S, rubric: Rubric) -> Self {
        Self::with_key(storage, rubric, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, rubric: Rubric, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            rubric,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Serialize the whole session and overwrite the stored draft.
    pub fn save(&mut self, session: &EvaluationSession) -> Result<()> {
        let json = serde_json::to_string(session).context("sérialisation de la session impossible")?;
        self.storage
            .set(&self.key, &json)
            .with_context(|| format!("enregistrement du brouillon '{}' impossible", self.key))?;
        tracing::debug!(key = %self.key, bytes = json.len(), "draft saved");
        Ok(())
    }

    /// Read the stored draft. Never errors; see [`LoadOutcome`].
    pub fn load(&self) -> LoadOutcome {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no draft stored");
                return LoadOutcome::Absent;
            }
            Err(e) => return self.discard(format!("illisible: {e:#}")),
        };

        let stages: Vec<StageEvaluation> = match serde_json::from_str(&raw) {
            Ok(stages) => stages,
            Err(e) => return self.discard(format!("brouillon illisible: {e}")),
        };

        match EvaluationSession::from_evaluations(&self.rubric, stages) {
            Ok(session) => {
                tracing::debug!(key = %self.key, "draft loaded");
                LoadOutcome::Loaded(session)
            }
            Err(e) => self.discard(e.to_string()),
        }
    }

    fn discard(&self, reason: String) -> LoadOutcome {
        tracing::warn!(key = %self.key, "discarding stored draft: {reason}");
        LoadOutcome::Invalid(reason)
    }
}
