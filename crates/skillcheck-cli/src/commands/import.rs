//! The `skillcheck import` command: roster TOML → data directory.

use std::path::PathBuf;

use anyhow::Result;

use skillcheck_core::parser;
use skillcheck_store::JsonStore;

pub fn execute(roster_path: PathBuf, data_dir: PathBuf) -> Result<()> {
    let roster = if roster_path.is_dir() {
        parser::load_roster_directory(&roster_path)?
    } else {
        parser::parse_roster(&roster_path)?
    };

    let warnings = parser::validate_roster(&roster);
    for w in &warnings {
        eprintln!("WARNING: {}", w.message);
    }

    let store = JsonStore::new(&data_dir);
    store.write_roster(
        &roster.students,
        &roster.subjects,
        &roster.checklists,
        &roster.assessors,
    )?;

    println!(
        "Imported {} students, {} subjects, {} checklists, {} assessors into {}",
        roster.students.len(),
        roster.subjects.len(),
        roster.checklists.len(),
        roster.assessors.len(),
        data_dir.display()
    );

    Ok(())
}
