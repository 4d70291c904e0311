//! The `scriptaudit init` command.

use anyhow::Result;

use scriptaudit_core::config::LOCAL_CONFIG_FILE;

pub fn execute() -> Result<()> {
    if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
        println!("{LOCAL_CONFIG_FILE} existe déjà, rien à faire.");
    } else {
        std::fs::write(LOCAL_CONFIG_FILE, SAMPLE_CONFIG)?;
        println!("{LOCAL_CONFIG_FILE} créé");
    }

    println!("\nÉtapes suivantes:");
    println!("  1. Vérifier storage_dir et export_dir dans {LOCAL_CONFIG_FILE}");
    println!("  2. Lancer: scriptaudit rubric");
    println!("  3. Lancer: scriptaudit edit");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# scriptaudit configuration

# Directory holding the saved draft.
storage_dir = ".scriptaudit"

# Draft key; the draft file is <storage_dir>/<storage_key>.json
storage_key = "audit-evaluation"

# Directory exports are written to.
export_dir = "."
"#;
