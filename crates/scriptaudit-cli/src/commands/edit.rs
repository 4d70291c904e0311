//! The `scriptaudit edit` command: the interactive evaluation form.
//!
//! Reads one command per line, applies it to the in-memory store and redraws
//! what changed. Nothing is written to disk except on `save` and `export`.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;

use scriptaudit_core::export::{ExportDocument, APPLICATION_NAME};
use scriptaudit_core::persistence::{KeyValueStorage, Persistence};
use scriptaudit_core::session::EvaluationSession;
use scriptaudit_core::store::EvaluationStore;
use scriptaudit_report::{render_session, render_stage_card, render_summary, Expansion};

use super::{load_draft, outcome_note};

const HELP: &str = "\
Commandes (étapes et critères numérotés à partir de 1):
  open <étape>                ouvrir/fermer une étape
  check <étape> <critère>     cocher un critère
  uncheck <étape> <critère>   décocher un critère
  score <étape> <1-5|->       noter une étape (- pour effacer)
  comment <étape> [texte]     remplacer le commentaire d'une étape (\\n pour aller à la ligne)
  show                        afficher le formulaire
  summary                     afficher le résumé
  save                        enregistrer le brouillon
  export                      exporter en JSON
  help                        afficher cette aide
  quit                        quitter sans enregistrer";

const SUBTITLE: &str = "Audit d’appels commerciaux";

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let loaded = load_draft(config_path.as_deref())?;
    let session = loaded.session();
    let note = outcome_note(&loaded.outcome);
    let persistence = loaded.config.persistence(loaded.rubric);

    tracing::debug!(
        draft = %loaded.config.draft_path().display(),
        loaded = loaded.outcome.is_loaded(),
        "starting editor"
    );
    let store = EvaluationStore::with_session(loaded.rubric, session)?;
    let mut editor = Editor::new(store, persistence, loaded.config.export_dir.clone());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    editor.run(stdin.lock(), stdout.lock(), note.as_deref())
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Toggle { stage: usize },
    Check { stage: usize, criterion: usize, value: bool },
    Score { stage: usize, value: String },
    Comment { stage: usize, text: String },
    Show,
    Summary,
    Save,
    Export,
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "open" | "toggle" => Ok(Action::Toggle {
                stage: position(rest, "étape")?,
            }),
            "check" | "uncheck" => {
                let (stage, criterion) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("usage: {word} <étape> <critère>"))?;
                Ok(Action::Check {
                    stage: position(stage, "étape")?,
                    criterion: position(criterion.trim(), "critère")?,
                    value: word.eq_ignore_ascii_case("check"),
                })
            }
            "score" => {
                let (stage, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: score <étape> <1-5|->".to_string())?;
                let value = match value.trim() {
                    "-" => String::new(),
                    v @ ("1" | "2" | "3" | "4" | "5") => v.to_string(),
                    other => return Err(format!("score invalide: {other} (1-5 ou -)")),
                };
                Ok(Action::Score {
                    stage: position(stage, "étape")?,
                    value,
                })
            }
            "comment" => {
                let (stage, text) = match rest.split_once(char::is_whitespace) {
                    Some((stage, text)) => (stage, text.trim()),
                    None => (rest, ""),
                };
                Ok(Action::Comment {
                    stage: position(stage, "étape")?,
                    text: text.replace("\\n", "\n"),
                })
            }
            "show" => Ok(Action::Show),
            "summary" => Ok(Action::Summary),
            "save" => Ok(Action::Save),
            "export" => Ok(Action::Export),
            "help" | "?" => Ok(Action::Help),
            "quit" | "exit" | "q" => Ok(Action::Quit),
            "" => Err("commande vide".to_string()),
            other => Err(format!("commande inconnue: {other} (tapez help)")),
        }
    }
}

/// Parse a 1-based number as shown on screen into a 0-based index.
fn position(s: &str, what: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("numéro d'{what} invalide: '{}'", s.trim())),
    }
}

/// The form: store, draft persistence and export target.
pub struct Editor<S> {
    store: EvaluationStore,
    persistence: Persistence<S>,
    export_dir: PathBuf,
    saved: EvaluationSession,
}

impl<S: KeyValueStorage> Editor<S> {
    pub fn new(store: EvaluationStore, persistence: Persistence<S>, export_dir: PathBuf) -> Self {
        let saved = store.session().clone();
        Self {
            store,
            persistence,
            export_dir,
            saved,
        }
    }

    pub fn store(&self) -> &EvaluationStore {
        &self.store
    }

    /// Whether the session differs from the last saved or loaded one.
    pub fn has_unsaved_changes(&self) -> bool {
        *self.store.session() != self.saved
    }

    /// Process input until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut out: W,
        note: Option<&str>,
    ) -> Result<()> {
        writeln!(out, "{APPLICATION_NAME}\n{SUBTITLE}\n")?;
        if let Some(note) = note {
            writeln!(out, "{note}")?;
        }
        self.draw_form(&mut out)?;
        writeln!(out, "Tapez help pour la liste des commandes.")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Action>() {
                Ok(Action::Quit) => break,
                Ok(action) => self.apply(action, &mut out)?,
                Err(msg) => writeln!(out, "Erreur: {msg}")?,
            }
        }

        if self.has_unsaved_changes() {
            writeln!(out, "Modifications non enregistrées abandonnées.")?;
        }
        Ok(())
    }

    /// Apply one action and write its feedback. Only output failures are
    /// returned; rejected input and failed saves are reported inline.
    pub fn apply<W: Write>(&mut self, action: Action, out: &mut W) -> Result<()> {
        let mutated = match action {
            Action::Toggle { stage } => Some((stage, self.store.toggle_open(stage))),
            Action::Check {
                stage,
                criterion,
                value,
            } => Some((stage, self.store.set_check(stage, criterion, value))),
            Action::Score { stage, value } => Some((stage, self.store.set_score(stage, &value))),
            Action::Comment { stage, text } => Some((stage, self.store.set_comments(stage, &text))),
            Action::Show => {
                self.draw_form(out)?;
                None
            }
            Action::Summary => {
                writeln!(out, "{}", render_summary(&self.store.summary()))?;
                None
            }
            Action::Save => {
                match self.persistence.save(self.store.session()) {
                    Ok(()) => {
                        self.saved = self.store.session().clone();
                        writeln!(out, "Brouillon enregistré.")?;
                    }
                    Err(e) => writeln!(out, "Erreur: {e:#}")?,
                }
                None
            }
            Action::Export => {
                let doc = ExportDocument::build(self.store.rubric(), self.store.session(), Utc::now());
                match doc.write_to_dir(&self.export_dir) {
                    Ok(path) => writeln!(out, "Exporté: {}", path.display())?,
                    Err(e) => writeln!(out, "Erreur: {e:#}")?,
                }
                None
            }
            Action::Help => {
                writeln!(out, "{HELP}")?;
                None
            }
            Action::Quit => None,
        };

        if let Some((stage, result)) = mutated {
            match result {
                Ok(()) => self.draw_stage(stage, out)?,
                Err(e) => writeln!(out, "Erreur: {e}")?,
            }
        }
        Ok(())
    }

    fn draw_form<W: Write>(&self, out: &mut W) -> Result<()> {
        let snapshot = self.store.snapshot();
        writeln!(
            out,
            "{}",
            render_session(self.store.rubric(), &snapshot, Expansion::AsStored)
        )?;
        writeln!(out, "{}", render_summary(&self.store.summary()))?;
        Ok(())
    }

    fn draw_stage<W: Write>(&self, stage: usize, out: &mut W) -> Result<()> {
        let snapshot = self.store.snapshot();
        if let (Some(def), Some(eval)) = (self.store.rubric().stage(stage), snapshot.get(stage)) {
            write!(out, "{}", render_stage_card(stage + 1, def, eval, eval.is_open()))?;
        }
        Ok(())
    }
}
