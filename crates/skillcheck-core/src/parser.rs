//! TOML roster parser.
//!
//! Loads roster collections (students, subjects, checklists, assessors)
//! from TOML files and directories, and validates them. Checklist subject
//! titles are resolved and denormalized at parse time so downstream
//! display never needs a live join.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Assessor, Checklist, Student, Subject};
use crate::traits::Roster;

/// Intermediate TOML structure for a roster file. Any collection may be
/// absent; directory loads merge several files into one roster.
#[derive(Debug, Default, Deserialize)]
struct TomlRosterFile {
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    subjects: Vec<Subject>,
    #[serde(default)]
    checklists: Vec<TomlChecklist>,
    #[serde(default)]
    assessors: Vec<Assessor>,
}

#[derive(Debug, Deserialize)]
struct TomlChecklist {
    id: String,
    title: String,
    subject_id: String,
    year_level: String,
    #[serde(default)]
    steps: Vec<String>,
}

impl TomlRosterFile {
    fn merge(&mut self, other: TomlRosterFile) {
        self.students.extend(other.students);
        self.subjects.extend(other.subjects);
        self.checklists.extend(other.checklists);
        self.assessors.extend(other.assessors);
    }

    fn resolve(self) -> Roster {
        let checklists = self
            .checklists
            .into_iter()
            .map(|c| {
                let subject = self
                    .subjects
                    .iter()
                    .find(|s| s.id == c.subject_id)
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                Checklist {
                    id: c.id,
                    title: c.title,
                    subject_id: c.subject_id,
                    subject,
                    year_level: c.year_level,
                    steps: c.steps,
                }
            })
            .collect();

        Roster {
            students: self.students,
            subjects: self.subjects,
            checklists,
            assessors: self.assessors,
        }
    }
}

/// Parse a single TOML roster file.
pub fn parse_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;
    parse_roster_str(&content, path)
}

/// Parse a TOML string into a [`Roster`] (useful for testing).
pub fn parse_roster_str(content: &str, source_path: &Path) -> Result<Roster> {
    let parsed: TomlRosterFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(parsed.resolve())
}

/// Recursively load and merge all `.toml` roster files from a directory.
///
/// Subject references are resolved after the merge, so a checklist file
/// may reference subjects declared in a sibling file. Unreadable files are
/// skipped with a warning.
pub fn load_roster_directory(dir: &Path) -> Result<Roster> {
    let mut merged = TomlRosterFile::default();
    collect_directory(dir, &mut merged)?;
    Ok(merged.resolve())
}

fn collect_directory(dir: &Path, merged: &mut TomlRosterFile) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in
        std::fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_directory(&path, merged)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| toml::from_str::<TomlRosterFile>(&content).map_err(Into::into))
            {
                Ok(file) => merged.merge(file),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(())
}

/// A warning from roster validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending entity's id (if applicable).
    pub entity_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a roster for common issues.
pub fn validate_roster(roster: &Roster) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate ids within each collection
    for (kind, ids) in [
        ("student", roster.students.iter().map(|s| &s.id).collect::<Vec<_>>()),
        ("subject", roster.subjects.iter().map(|s| &s.id).collect()),
        ("checklist", roster.checklists.iter().map(|c| &c.id).collect()),
        ("assessor", roster.assessors.iter().map(|a| &a.id).collect()),
    ] {
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                warnings.push(ValidationWarning {
                    entity_id: Some(id.clone()),
                    message: format!("duplicate {kind} ID: {id}"),
                });
            }
        }
    }

    // A checklist without steps cannot be used in a live assessment
    for checklist in &roster.checklists {
        if checklist.steps.is_empty() {
            warnings.push(ValidationWarning {
                entity_id: Some(checklist.id.clone()),
                message: "checklist has no steps".into(),
            });
        }
    }

    // Dangling subject references
    for checklist in &roster.checklists {
        if roster.find_subject(&checklist.subject_id).is_none() {
            warnings.push(ValidationWarning {
                entity_id: Some(checklist.id.clone()),
                message: format!("unknown subject_id: {}", checklist.subject_id),
            });
        }
    }

    // An assessor without a PIN could never sign anything off
    for assessor in &roster.assessors {
        if assessor.verification_code.is_empty() {
            warnings.push(ValidationWarning {
                entity_id: Some(assessor.id.clone()),
                message: "assessor has an empty verification code".into(),
            });
        }
    }

    warnings
}
