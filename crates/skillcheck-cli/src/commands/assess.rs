//! The `skillcheck assess` command: drives one assessment session from
//! selection through PIN verification to a persisted record.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillcheck_core::session::{popular_checklists, AssessmentSession};
use skillcheck_core::traits::{RecordStore, Roster};
use skillcheck_store::JsonStore;

pub async fn execute(
    data_dir: PathBuf,
    student: String,
    checklist: Option<String>,
    assessor: String,
    scores: String,
    pin: String,
) -> Result<()> {
    let store = JsonStore::new(&data_dir);
    let roster = Roster::load(&store).await?;
    let assessments = store.list_assessments().await?;

    let Some(checklist_id) = checklist else {
        // No checklist chosen: suggest the popular ones, like the
        // quick-select shortcuts on the assessment screen.
        let popular = popular_checklists(&roster.checklists, &assessments);
        if popular.is_empty() {
            eprintln!("No assessment history yet. Available checklists:");
            for c in &roster.checklists {
                eprintln!("  {} — {} (year {})", c.id, c.title, c.year_level);
            }
        } else {
            eprintln!("Popular checklists:");
            for (c, count) in &popular {
                eprintln!("  {} — {} ({count} assessments)", c.id, c.title);
            }
        }
        anyhow::bail!("--checklist is required");
    };

    let step_scores = parse_scores(&scores)?;

    let mut session = AssessmentSession::new();
    session.select_student(&student);
    session.select_checklist(&checklist_id);
    session.select_assessor(&assessor);
    session.begin(&roster)?;

    let total_steps = session
        .active_checklist()
        .map(|c| c.steps.len())
        .unwrap_or(0);
    anyhow::ensure!(
        step_scores.len() <= total_steps,
        "{} scores given but checklist has {} steps",
        step_scores.len(),
        total_steps
    );

    for (index, score) in step_scores.iter().enumerate() {
        session.record_step_score(index, *score)?;
    }

    let live = session.live_score().context("no active session")?;
    println!(
        "Scored {}/{} steps, current score {}%",
        step_scores.len(),
        total_steps,
        live.percentage
    );

    session.request_finalize(&roster)?;
    let record = match session.submit_pin(&pin) {
        Ok(record) => record,
        Err(e) => {
            // Wrong PIN keeps the session alive in an interactive UI; in a
            // one-shot invocation there is nobody left to retry, so drop
            // the session explicitly and report.
            session.abandon(true).ok();
            return Err(e).context("verification failed, no record created");
        }
    };

    println!(
        "Finalized: {} — {} scored {}% ({} of {} steps fully performed), signed by {}",
        record.student_name,
        record.checklist_title,
        record.score,
        record.completed_step_indices.len(),
        record.total_steps,
        record.assessor_name
    );

    // The record is final from here; a store failure is surfaced as a
    // warning, never a rollback.
    if let Err(e) = store.create_assessment(&record).await {
        eprintln!("Warning: record {} not persisted: {e}", record.id);
    } else {
        println!("Record {} saved.", record.id);
    }

    Ok(())
}

fn parse_scores(scores: &str) -> Result<Vec<u8>> {
    scores
        .split(',')
        .map(|s| {
            let score: u8 = s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid score: '{}'", s.trim()))?;
            anyhow::ensure!(score <= 2, "invalid score {score}, expected 0, 1 or 2");
            Ok(score)
        })
        .collect()
}
