//! The `scriptaudit rubric` command.

use anyhow::Result;

use scriptaudit_core::rubric::Rubric;
use scriptaudit_report::render_rubric;

pub fn execute() -> Result<()> {
    let rubric = Rubric::standard();
    println!("{}", render_rubric(&rubric));
    println!(
        "{} étapes, {} critères, score maximal {}",
        rubric.len(),
        rubric.total_criteria(),
        rubric.max_score()
    );
    Ok(())
}
