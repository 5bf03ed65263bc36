//! The `skillcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use skillcheck_core::parser;

pub fn execute(roster_path: PathBuf) -> Result<()> {
    let roster = if roster_path.is_dir() {
        parser::load_roster_directory(&roster_path)?
    } else {
        parser::parse_roster(&roster_path)?
    };

    println!(
        "Roster: {} students, {} subjects, {} checklists, {} assessors",
        roster.students.len(),
        roster.subjects.len(),
        roster.checklists.len(),
        roster.assessors.len()
    );

    let warnings = parser::validate_roster(&roster);
    for w in &warnings {
        let prefix = w
            .entity_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Roster valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
