//! The `skillcheck results` command: assessment history listing.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillcheck_core::analytics;
use skillcheck_core::traits::RecordStore;
use skillcheck_store::JsonStore;

pub async fn execute(data_dir: PathBuf, search: Option<String>) -> Result<()> {
    let store = JsonStore::new(&data_dir);
    let assessments = store.list_assessments().await?;

    let mut numbered = analytics::number_attempts(&assessments);
    if let Some(term) = &search {
        numbered = analytics::search_results(&numbered, term);
    }
    // Newest first for display; attempt numbers were assigned
    // chronologically before the flip.
    numbered.reverse();

    if numbered.is_empty() {
        println!("No assessment records found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Ref",
        "Date",
        "Student",
        "Procedure",
        "Attempt",
        "Assessor",
        "Completion",
        "Score",
    ]);
    for row in &numbered {
        let a = &row.assessment;
        let short_id: String = a.id.to_string().chars().take(8).collect();
        table.add_row(vec![
            Cell::new(short_id),
            Cell::new(a.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&a.student_name),
            Cell::new(&a.checklist_title),
            Cell::new(row.attempt_number),
            Cell::new(&a.assessor_name),
            Cell::new(format!(
                "{}/{}",
                a.completed_step_indices.len(),
                a.total_steps
            )),
            Cell::new(format!("{}%", a.score)),
        ]);
    }

    println!("{table}");
    println!("{} record(s)", numbered.len());

    Ok(())
}
