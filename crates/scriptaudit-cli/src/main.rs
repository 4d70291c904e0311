//! scriptaudit CLI — the sales-call script evaluation form.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "scriptaudit",
    version,
    about = "Formulaire d'évaluation de script d'appel commercial"
)]
struct Cli {
    /// Chemin du fichier de configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remplir l'évaluation de façon interactive (commandes lues sur stdin)
    Edit,

    /// Afficher le brouillon enregistré, toutes les étapes dépliées
    Show,

    /// Afficher le résumé (checklist et score) du brouillon enregistré
    Summary {
        /// Format de sortie: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Exporter le brouillon enregistré en rapport JSON
    Export {
        /// Répertoire de sortie (export_dir de la configuration par défaut)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Lister les étapes et critères de la grille
    Rubric,

    /// Indiquer si le brouillon enregistré est absent, valide ou ignoré
    CheckDraft,

    /// Créer un fichier de configuration initial
    Init,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scriptaudit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Edit => commands::edit::execute(config),
        Commands::Show => commands::show::execute(config),
        Commands::Summary { format } => commands::summary::execute(config, format),
        Commands::Export { output } => commands::export::execute(config, output),
        Commands::Rubric => commands::rubric::execute(),
        Commands::CheckDraft => commands::check_draft::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Erreur: {e:#}");
        process::exit(1);
    }
}
