//! The `skillcheck init` command: starter roster and data directory.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillcheck_core::parser;
use skillcheck_store::JsonStore;

const STARTER_ROSTER: &str = r#"# skillcheck roster
#
# Students, subjects, checklists and assessors live here. Edit freely and
# re-run `skillcheck import` to refresh the data directory.

[[subjects]]
id = "sub-clin"
code = "MED301"
title = "Clinical Skills"
year_level = "3"

[[students]]
id = "s1"
name = "Amina Yusuf"
matric_number = "M1001"
group = "A"
year_level = "3"

[[students]]
id = "s2"
name = "Tunde Okafor"
matric_number = "M1002"
group = "B"
year_level = "3"

[[checklists]]
id = "c-iv"
title = "IV Cannulation"
subject_id = "sub-clin"
year_level = "3"
steps = [
    "Wash hands and don gloves",
    "Apply tourniquet and select vein",
    "Clean site and insert cannula",
    "Secure cannula and dispose of sharps",
    "Document the procedure",
]

[[checklists]]
id = "c-bp"
title = "Blood Pressure Measurement"
subject_id = "sub-clin"
year_level = "3"
steps = [
    "Position patient and expose arm",
    "Select and apply correct cuff size",
    "Palpate and estimate systolic pressure",
    "Auscultate and record pressure",
]

[[assessors]]
id = "a1"
name = "Dr. Bello"
verification_code = "4321"
role = "Senior Lecturer"
"#;

pub fn execute(dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let roster_path = dir.join("roster.toml");
    if roster_path.exists() {
        anyhow::bail!("refusing to overwrite existing {}", roster_path.display());
    }
    std::fs::write(&roster_path, STARTER_ROSTER)
        .with_context(|| format!("failed to write {}", roster_path.display()))?;
    println!("Created {}", roster_path.display());

    let roster = parser::parse_roster(&roster_path)?;
    let data_dir = dir.join("data");
    let store = JsonStore::new(&data_dir);
    store.write_roster(
        &roster.students,
        &roster.subjects,
        &roster.checklists,
        &roster.assessors,
    )?;
    println!("Imported starter roster into {}", data_dir.display());
    println!("\nTry: skillcheck dashboard --data-dir {}", data_dir.display());

    Ok(())
}
