//! Core data model types for skillcheck.
//!
//! These are the fundamental records the whole system exchanges: the
//! collaborator-owned roster entities (students, subjects, checklists,
//! assessors) and the records the core produces (assessments, OSCE
//! sessions). Roster entities carry `String` identities assigned by the
//! external registry; core-generated records use `Uuid` identities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Registry identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Matriculation number.
    pub matric_number: String,
    /// Teaching group (e.g. "A", "B2").
    pub group: String,
    /// Year of study as recorded by the registry (e.g. "3").
    pub year_level: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// A course subject that checklists belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Registry identifier.
    pub id: String,
    /// Course code (e.g. "MED301").
    pub code: String,
    /// Course title.
    pub title: String,
    /// Year the subject is taught in.
    pub year_level: String,
}

/// A procedural skill rubric: an ordered sequence of step descriptions.
///
/// A checklist used in a live assessment must have at least one step; the
/// session state machine rejects empty checklists at start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    /// Registry identifier.
    pub id: String,
    /// Procedure title (e.g. "IV Cannulation").
    pub title: String,
    /// Identity of the owning subject.
    pub subject_id: String,
    /// Subject title, denormalized for display.
    pub subject: String,
    /// Year level the rubric targets.
    pub year_level: String,
    /// Ordered step descriptions, scored 0/1/2 each.
    pub steps: Vec<String>,
}

/// An assessor who signs off finalized assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessor {
    /// Registry identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// The PIN required to finalize an assessment. Compared exact-match,
    /// case-sensitive, no normalization.
    pub verification_code: String,
    /// e.g. "Senior Lecturer", "Resident".
    #[serde(default)]
    pub role: Option<String>,
}

/// A finalized, immutable scored record.
///
/// Names and titles are point-in-time snapshots captured at finalization,
/// not live joins; deleting the referenced student or checklist elsewhere
/// does not change an existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Record identifier, generated at finalization.
    pub id: Uuid,
    /// Weak reference to the assessed student.
    pub student_id: String,
    /// Weak reference to the checklist used.
    pub checklist_id: String,
    /// Checklist title snapshot.
    pub checklist_title: String,
    /// Student name snapshot.
    pub student_name: String,
    /// Name of the assessor who signed off.
    pub assessor_name: String,
    /// Indices of steps scored exactly 2 (legacy completion projection).
    pub completed_step_indices: Vec<usize>,
    /// Dense per-step scores, one entry per checklist step.
    pub step_scores: Vec<u8>,
    /// Number of steps in the checklist at assessment time.
    pub total_steps: usize,
    /// Percentage score out of `total_steps * 2` possible points.
    pub score: u32,
    /// When the record was finalized.
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle status of an OSCE exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Upcoming,
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Upcoming => write!(f, "upcoming"),
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(SessionStatus::Upcoming),
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// A multi-station exam session. Created empty; circuits are added and
/// removed through [`crate::osce::OscePlanner`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsceSession {
    pub id: Uuid,
    /// e.g. "Year 3 Sem 1 Final OSCE".
    pub title: String,
    /// Exam date as entered (e.g. "2026-03-14").
    pub date: String,
    /// Start time as entered ("HH:MM").
    pub start_time: String,
    pub status: SessionStatus,
    /// Circuits owned exclusively by this session.
    pub circuits: Vec<OsceCircuit>,
}

/// A track of stations within a session (e.g. "Circuit A").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsceCircuit {
    pub id: Uuid,
    pub title: String,
    /// Stations owned exclusively by this circuit.
    pub stations: Vec<OsceStation>,
}

/// A single exam station within a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsceStation {
    pub id: Uuid,
    /// 1-based position assigned at insertion. NOT resynced when earlier
    /// stations are deleted; listings display array order instead.
    pub number: u32,
    pub title: String,
    /// Free-text scenario instructions for the candidate.
    pub description: String,
    pub duration_minutes: u32,
    /// Weak reference to the checklist used for grading here.
    pub checklist_id: String,
    /// Checklist title snapshot taken at insertion.
    pub checklist_title: String,
}

/// Distinct year levels present in a student roster, sorted.
pub fn unique_student_years(students: &[Student]) -> Vec<String> {
    let mut years: Vec<String> = students.iter().map(|s| s.year_level.clone()).collect();
    years.sort();
    years.dedup();
    years
}

/// Distinct year levels present across checklists, sorted.
pub fn unique_checklist_years(checklists: &[Checklist]) -> Vec<String> {
    let mut years: Vec<String> = checklists.iter().map(|c| c.year_level.clone()).collect();
    years.sort();
    years.dedup();
    years
}

/// Filter students by optional year and group.
pub fn filter_students<'a>(
    students: &'a [Student],
    year: Option<&str>,
    group: Option<&str>,
) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|s| year.is_none_or(|y| s.year_level == y))
        .filter(|s| group.is_none_or(|g| s.group == g))
        .collect()
}

/// Filter checklists by optional year level.
pub fn filter_checklists<'a>(checklists: &'a [Checklist], year: Option<&str>) -> Vec<&'a Checklist> {
    checklists
        .iter()
        .filter(|c| year.is_none_or(|y| c.year_level == y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, year: &str, group: &str) -> Student {
        Student {
            id: id.into(),
            name: format!("Student {id}"),
            matric_number: format!("M{id}"),
            group: group.into(),
            year_level: year.into(),
            email: None,
            phone_number: None,
        }
    }

    #[test]
    fn status_display_and_parse() {
        assert_eq!(SessionStatus::Upcoming.to_string(), "upcoming");
        assert_eq!(
            "ACTIVE".parse::<SessionStatus>().unwrap(),
            SessionStatus::Active
        );
        assert_eq!(
            "completed".parse::<SessionStatus>().unwrap(),
            SessionStatus::Completed
        );
        assert!("archived".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn assessment_serde_roundtrip() {
        let record = Assessment {
            id: Uuid::nil(),
            student_id: "s1".into(),
            checklist_id: "c1".into(),
            checklist_title: "IV Cannulation".into(),
            student_name: "Amina Yusuf".into(),
            assessor_name: "Dr. Bello".into(),
            completed_step_indices: vec![0, 2],
            step_scores: vec![2, 1, 2],
            total_steps: 3,
            score: 83,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: Assessment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 83);
        assert_eq!(back.completed_step_indices, vec![0, 2]);
    }

    #[test]
    fn filter_checklists_by_year() {
        let make = |id: &str, year: &str| Checklist {
            id: id.into(),
            title: format!("Checklist {id}"),
            subject_id: "sub".into(),
            subject: "Clinical Skills".into(),
            year_level: year.into(),
            steps: vec!["Step".into()],
        };
        let lists = vec![make("a", "3"), make("b", "4"), make("c", "3")];

        assert_eq!(filter_checklists(&lists, Some("3")).len(), 2);
        assert_eq!(filter_checklists(&lists, None).len(), 3);
        assert_eq!(unique_checklist_years(&lists), vec!["3", "4"]);
    }

    #[test]
    fn filter_students_by_year_and_group() {
        let roster = vec![
            student("a", "3", "A"),
            student("b", "3", "B"),
            student("c", "4", "A"),
        ];
        assert_eq!(filter_students(&roster, Some("3"), None).len(), 2);
        assert_eq!(filter_students(&roster, Some("3"), Some("B")).len(), 1);
        assert_eq!(filter_students(&roster, None, None).len(), 3);
        assert_eq!(unique_student_years(&roster), vec!["3", "4"]);
    }
}
