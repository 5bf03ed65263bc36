//! The `skillcheck dashboard` command: aggregate tables.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillcheck_core::analytics;
use skillcheck_core::traits::{RecordStore, Roster};
use skillcheck_store::JsonStore;

pub async fn execute(data_dir: PathBuf) -> Result<()> {
    let store = JsonStore::new(&data_dir);
    let roster = Roster::load(&store).await?;
    let assessments = store.list_assessments().await?;

    println!(
        "{} students | {} checklists | {} assessments | avg score {}%\n",
        roster.students.len(),
        roster.checklists.len(),
        assessments.len(),
        analytics::overall_average(&assessments)
    );

    let by_year = analytics::by_year(&assessments, &roster.students);
    if !by_year.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Year of Study", "Assessments", "Avg Score"]);
        for row in &by_year {
            table.add_row(vec![
                Cell::new(format!("Year {}", row.year_level)),
                Cell::new(row.count),
                Cell::new(format!("{}%", row.average)),
            ]);
        }
        println!("Performance by year of study\n{table}\n");
    }

    let by_subject = analytics::by_subject(&assessments, &roster.checklists);
    if !by_subject.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Records", "Avg Score"]);
        for row in &by_subject {
            table.add_row(vec![
                Cell::new(&row.subject),
                Cell::new(row.count),
                Cell::new(format!("{}%", row.average)),
            ]);
        }
        println!("Performance by subject\n{table}\n");
    }

    let by_checklist = analytics::by_checklist(&roster.checklists, &assessments);
    let mut table = Table::new();
    table.set_header(vec![
        "Checklist",
        "Subject",
        "Target Year",
        "Assessments",
        "Avg Score",
    ]);
    for row in &by_checklist {
        table.add_row(vec![
            Cell::new(&row.title),
            Cell::new(&row.subject),
            Cell::new(format!("Year {}", row.year_level)),
            Cell::new(row.count),
            Cell::new(if row.count > 0 {
                format!("{}%", row.average)
            } else {
                "-".to_string()
            }),
        ]);
    }
    println!("Checklist analytics\n{table}");

    Ok(())
}
