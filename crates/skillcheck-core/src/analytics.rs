//! Read-only aggregation over the assessment collection.
//!
//! Every function here is a pure query over snapshots, recomputed on
//! demand; nothing is cached or stored (collections are classroom-scale).
//! Assessments whose referenced student or checklist has since been
//! deleted are excluded from the affected grouping without error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Assessment, Checklist, Student};

/// Count and average score for one year-of-study cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearPerformance {
    pub year_level: String,
    pub count: usize,
    /// Integer-rounded mean percentage.
    pub average: u32,
}

/// Count and average score for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectPerformance {
    pub subject: String,
    pub count: usize,
    pub average: u32,
}

/// Usage and average score for one checklist. Present even when the
/// checklist has never been used (`count` 0, `average` 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistUsage {
    pub checklist_id: String,
    pub title: String,
    pub subject: String,
    pub year_level: String,
    pub count: usize,
    pub average: u32,
}

/// An assessment enriched with its 1-based attempt number for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberedAssessment {
    #[serde(flatten)]
    pub assessment: Assessment,
    /// 1-based position among this (student, checklist) pair's attempts,
    /// in chronological order.
    pub attempt_number: u32,
}

/// Integer-rounded mean score across all records; 0 when empty.
pub fn overall_average(assessments: &[Assessment]) -> u32 {
    if assessments.is_empty() {
        return 0;
    }
    let total: u64 = assessments.iter().map(|a| u64::from(a.score)).sum();
    (total as f64 / assessments.len() as f64).round() as u32
}

/// Performance grouped by the referenced student's year of study, resolved
/// at aggregation time (not from record snapshots). Sorted ascending by
/// numeric year. Records whose student no longer exists are skipped.
pub fn by_year(assessments: &[Assessment], students: &[Student]) -> Vec<YearPerformance> {
    let year_of: HashMap<&str, &str> = students
        .iter()
        .map(|s| (s.id.as_str(), s.year_level.as_str()))
        .collect();

    let mut groups: HashMap<&str, (u64, usize)> = HashMap::new();
    for record in assessments {
        if let Some(year) = year_of.get(record.student_id.as_str()) {
            let entry = groups.entry(year).or_default();
            entry.0 += u64::from(record.score);
            entry.1 += 1;
        }
    }

    let mut rows: Vec<YearPerformance> = groups
        .into_iter()
        .map(|(year, (total, count))| YearPerformance {
            year_level: year.to_string(),
            count,
            average: mean(total, count),
        })
        .collect();
    rows.sort_by_key(|row| numeric_year(&row.year_level));
    rows
}

/// Performance grouped by the referenced checklist's subject, resolved at
/// aggregation time. Sorted descending by average score. Records whose
/// checklist no longer exists are skipped.
pub fn by_subject(assessments: &[Assessment], checklists: &[Checklist]) -> Vec<SubjectPerformance> {
    let subject_of: HashMap<&str, &str> = checklists
        .iter()
        .map(|c| (c.id.as_str(), c.subject.as_str()))
        .collect();

    let mut groups: HashMap<&str, (u64, usize)> = HashMap::new();
    for record in assessments {
        if let Some(subject) = subject_of.get(record.checklist_id.as_str()) {
            let entry = groups.entry(subject).or_default();
            entry.0 += u64::from(record.score);
            entry.1 += 1;
        }
    }

    let mut rows: Vec<SubjectPerformance> = groups
        .into_iter()
        .map(|(subject, (total, count))| SubjectPerformance {
            subject: subject.to_string(),
            count,
            average: mean(total, count),
        })
        .collect();
    rows.sort_by(|a, b| b.average.cmp(&a.average));
    rows
}

/// Usage breakdown for every checklist, including never-used ones. Sorted
/// descending by usage count.
pub fn by_checklist(checklists: &[Checklist], assessments: &[Assessment]) -> Vec<ChecklistUsage> {
    let mut rows: Vec<ChecklistUsage> = checklists
        .iter()
        .map(|checklist| {
            let scores: Vec<u64> = assessments
                .iter()
                .filter(|a| a.checklist_id == checklist.id)
                .map(|a| u64::from(a.score))
                .collect();
            let count = scores.len();
            ChecklistUsage {
                checklist_id: checklist.id.clone(),
                title: checklist.title.clone(),
                subject: checklist.subject.clone(),
                year_level: checklist.year_level.clone(),
                count,
                average: mean(scores.iter().sum(), count),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Assign 1-based attempt numbers per (student, checklist) pair in
/// chronological order. Recomputed from scratch on every call; the
/// returned records are in chronological order, whatever order the input
/// was in.
pub fn number_attempts(assessments: &[Assessment]) -> Vec<NumberedAssessment> {
    let mut chronological: Vec<&Assessment> = assessments.iter().collect();
    chronological.sort_by_key(|a| a.timestamp);

    let mut attempts: HashMap<(String, String), u32> = HashMap::new();
    chronological
        .into_iter()
        .map(|record| {
            let key = (record.student_id.clone(), record.checklist_id.clone());
            let attempt = attempts.entry(key).or_insert(0);
            *attempt += 1;
            NumberedAssessment {
                assessment: record.clone(),
                attempt_number: *attempt,
            }
        })
        .collect()
}

/// Case-insensitive substring filter over result listings: matches student
/// name, checklist title, assessor name or record id.
pub fn search_results(records: &[NumberedAssessment], term: &str) -> Vec<NumberedAssessment> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| {
            let a = &r.assessment;
            a.student_name.to_lowercase().contains(&needle)
                || a.checklist_title.to_lowercase().contains(&needle)
                || a.assessor_name.to_lowercase().contains(&needle)
                || a.id.to_string().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

fn mean(total: u64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u32
}

/// Unparseable year labels sort after numeric ones.
fn numeric_year(year: &str) -> u32 {
    year.trim().parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn student(id: &str, year: &str) -> Student {
        Student {
            id: id.into(),
            name: format!("Student {id}"),
            matric_number: format!("M{id}"),
            group: "A".into(),
            year_level: year.into(),
            email: None,
            phone_number: None,
        }
    }

    fn checklist(id: &str, subject: &str) -> Checklist {
        Checklist {
            id: id.into(),
            title: format!("Checklist {id}"),
            subject_id: format!("sub-{subject}"),
            subject: subject.into(),
            year_level: "3".into(),
            steps: vec!["Step".into()],
        }
    }

    fn record(student_id: &str, checklist_id: &str, score: u32, minute: u32) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            checklist_id: checklist_id.into(),
            checklist_title: format!("Checklist {checklist_id}"),
            student_name: format!("Student {student_id}"),
            assessor_name: "Dr. Bello".into(),
            completed_step_indices: vec![],
            step_scores: vec![],
            total_steps: 1,
            score,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn by_year_groups_and_sorts_ascending() {
        let students = vec![student("s1", "3"), student("s2", "10"), student("s3", "2")];
        let assessments = vec![
            record("s1", "c1", 80, 0),
            record("s1", "c1", 60, 1),
            record("s2", "c1", 90, 2),
            record("s3", "c1", 50, 3),
        ];

        let rows = by_year(&assessments, &students);
        // Numeric sort: 2, 3, 10 (a lexicographic sort would give 10 first).
        let years: Vec<&str> = rows.iter().map(|r| r.year_level.as_str()).collect();
        assert_eq!(years, vec!["2", "3", "10"]);
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[1].average, 70);
    }

    #[test]
    fn by_year_skips_deleted_students() {
        let students = vec![student("s1", "3")];
        let assessments = vec![record("s1", "c1", 80, 0), record("deleted", "c1", 10, 1)];

        let rows = by_year(&assessments, &students);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[0].average, 80);
    }

    #[test]
    fn by_subject_sorts_by_average_descending() {
        let checklists = vec![checklist("c1", "Surgery"), checklist("c2", "Paediatrics")];
        let assessments = vec![
            record("s1", "c1", 60, 0),
            record("s1", "c2", 90, 1),
            record("s2", "c2", 80, 2),
            record("s1", "orphan", 100, 3),
        ];

        let rows = by_subject(&assessments, &checklists);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "Paediatrics");
        assert_eq!(rows[0].average, 85);
        assert_eq!(rows[1].subject, "Surgery");
    }

    #[test]
    fn by_checklist_includes_unused_and_sorts_by_count() {
        let checklists = vec![checklist("used", "Surgery"), checklist("unused", "Surgery")];
        let assessments = vec![record("s1", "used", 75, 0), record("s2", "used", 85, 1)];

        let rows = by_checklist(&checklists, &assessments);
        assert_eq!(rows[0].checklist_id, "used");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].average, 80);
        // Zero-assessment checklist is present, sorted after, and safe.
        assert_eq!(rows[1].checklist_id, "unused");
        assert_eq!(rows[1].count, 0);
        assert_eq!(rows[1].average, 0);
    }

    #[test]
    fn attempt_numbers_follow_chronology_not_input_order() {
        // Inserted newest-first; numbering must still follow timestamps.
        let assessments = vec![
            record("s1", "c1", 90, 30),
            record("s1", "c1", 70, 10),
            record("s1", "c1", 50, 20),
            record("s2", "c1", 60, 15),
        ];

        let numbered = number_attempts(&assessments);
        let pairs: Vec<(u32, u32)> = numbered
            .iter()
            .filter(|n| n.assessment.student_id == "s1")
            .map(|n| (n.assessment.score, n.attempt_number))
            .collect();
        assert_eq!(pairs, vec![(70, 1), (50, 2), (90, 3)]);

        // Independent pair gets its own numbering.
        let other: Vec<u32> = numbered
            .iter()
            .filter(|n| n.assessment.student_id == "s2")
            .map(|n| n.attempt_number)
            .collect();
        assert_eq!(other, vec![1]);
    }

    #[test]
    fn overall_average_rounds() {
        assert_eq!(overall_average(&[]), 0);
        let assessments = vec![record("s1", "c1", 70, 0), record("s1", "c1", 75, 1)];
        // 72.5 rounds half-up to 73.
        assert_eq!(overall_average(&assessments), 73);
    }

    #[test]
    fn search_matches_across_fields() {
        let numbered = number_attempts(&[record("s1", "c1", 70, 0), record("s2", "c2", 80, 1)]);

        assert_eq!(search_results(&numbered, "student s1").len(), 1);
        assert_eq!(search_results(&numbered, "CHECKLIST C2").len(), 1);
        assert_eq!(search_results(&numbered, "bello").len(), 2);
        assert_eq!(search_results(&numbered, "no such thing").len(), 0);
    }
}
