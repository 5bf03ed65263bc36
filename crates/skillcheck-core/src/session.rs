//! Assessment session state machine.
//!
//! Manages the lifecycle of one live assessment: selection (`Configuring`)
//! → per-step scoring (`InProgress`) → PIN sign-off
//! (`PendingVerification`) → an immutable [`Assessment`] record. One
//! session instance is active at a time, matching one assessor working at
//! one device. Transition methods return typed errors and leave the
//! session untouched on failure; nothing here panics or loses data except
//! the explicitly confirmed abandon path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{Assessment, Assessor, Checklist, Student};
use crate::scoring::{self, ScoreSheet, FULL_SCORE};
use crate::traits::Roster;

/// Where a session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Choosing student, checklist and assessor.
    Configuring,
    /// Live scoring; the elapsed-time counter is running.
    InProgress,
    /// A finalize was requested; waiting for the assessor's PIN.
    PendingVerification,
}

impl SessionPhase {
    fn name(self) -> &'static str {
        match self {
            SessionPhase::Configuring => "configuring",
            SessionPhase::InProgress => "in-progress",
            SessionPhase::PendingVerification => "pending-verification",
        }
    }
}

/// Elapsed-seconds counter backed by a spawned tokio task ticking once per
/// second. Cosmetic (display only, never used in scoring). The task is
/// aborted on [`ElapsedTimer::stop`] and on drop so a finalized or
/// abandoned session never leaks a running ticker.
///
/// Requires a tokio runtime.
struct ElapsedTimer {
    seconds: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl ElapsedTimer {
    fn start() -> Self {
        let seconds = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&seconds);
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; skip it so the counter
            // reads 0 for the first second.
            tick.tick().await;
            loop {
                tick.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        Self { seconds, handle }
    }

    fn elapsed_secs(&self) -> u64 {
        self.seconds.load(Ordering::Relaxed)
    }

    fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Snapshots and live scoring state for a started assessment.
struct ActiveAssessment {
    student: Student,
    checklist: Checklist,
    assessor: Assessor,
    /// Sparse step-index → score mapping; unset means 0.
    scores: HashMap<usize, u8>,
    timer: ElapsedTimer,
}

/// The assessment session state machine.
#[derive(Default)]
pub struct AssessmentSession {
    selected_student: Option<String>,
    selected_checklist: Option<String>,
    selected_assessor: Option<String>,
    /// Year filter that quick-select pre-fills alongside the checklist.
    checklist_year_filter: Option<String>,
    active: Option<ActiveAssessment>,
    verifying: bool,
    verification_error: Option<String>,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.active, self.verifying) {
            (None, _) => SessionPhase::Configuring,
            (Some(_), false) => SessionPhase::InProgress,
            (Some(_), true) => SessionPhase::PendingVerification,
        }
    }

    /// Whether a protected session is live. The hosting application uses
    /// this as its navigation guard: while true, leaving requires the
    /// confirmed [`AssessmentSession::abandon`] path.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Seconds since the session entered `InProgress`; 0 when idle.
    pub fn elapsed_secs(&self) -> u64 {
        self.active.as_ref().map_or(0, |a| a.timer.elapsed_secs())
    }

    /// Select the student to assess. Honored only while `Configuring`.
    pub fn select_student(&mut self, id: impl Into<String>) {
        if self.active.is_none() {
            self.selected_student = Some(id.into());
        }
    }

    /// Select the checklist to grade against. Honored only while
    /// `Configuring`.
    pub fn select_checklist(&mut self, id: impl Into<String>) {
        if self.active.is_none() {
            self.selected_checklist = Some(id.into());
        }
    }

    /// Select the assessor who will sign off. Honored only while
    /// `Configuring`.
    pub fn select_assessor(&mut self, id: impl Into<String>) {
        if self.active.is_none() {
            self.selected_assessor = Some(id.into());
        }
    }

    /// Quick-select shortcut: pre-fills the checklist and its year filter
    /// from one of the [`popular_checklists`]. Honored only while
    /// `Configuring`.
    pub fn quick_select(&mut self, checklist: &Checklist) {
        if self.active.is_none() {
            self.checklist_year_filter = Some(checklist.year_level.clone());
            self.selected_checklist = Some(checklist.id.clone());
        }
    }

    pub fn checklist_year_filter(&self) -> Option<&str> {
        self.checklist_year_filter.as_deref()
    }

    /// `Configuring → InProgress`. Requires all three selections to be
    /// present and resolvable against the roster snapshot, and the
    /// checklist to have at least one step. On error the session is
    /// unchanged and `begin` can be retried after fixing the selection.
    ///
    /// Starts the per-second elapsed counter; must run inside a tokio
    /// runtime.
    pub fn begin(&mut self, roster: &Roster) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Configuring)?;

        let student_id = self
            .selected_student
            .as_deref()
            .ok_or(SessionError::MissingSelection("student"))?;
        let checklist_id = self
            .selected_checklist
            .as_deref()
            .ok_or(SessionError::MissingSelection("checklist"))?;
        let assessor_id = self
            .selected_assessor
            .as_deref()
            .ok_or(SessionError::MissingSelection("assessor"))?;

        let student = roster
            .find_student(student_id)
            .ok_or_else(|| SessionError::UnknownStudent(student_id.to_string()))?
            .clone();
        let checklist = roster
            .find_checklist(checklist_id)
            .ok_or_else(|| SessionError::UnknownChecklist(checklist_id.to_string()))?
            .clone();
        let assessor = roster
            .find_assessor(assessor_id)
            .ok_or_else(|| SessionError::UnknownAssessor(assessor_id.to_string()))?
            .clone();

        if checklist.steps.is_empty() {
            return Err(SessionError::EmptyChecklist(checklist.id));
        }

        tracing::debug!(
            student = %student.name,
            checklist = %checklist.title,
            assessor = %assessor.name,
            "assessment started"
        );

        self.active = Some(ActiveAssessment {
            student,
            checklist,
            assessor,
            scores: HashMap::new(),
            timer: ElapsedTimer::start(),
        });
        self.verifying = false;
        self.verification_error = None;
        Ok(())
    }

    /// Record (or overwrite) the score for one step. `InProgress` only;
    /// the live percentage reflects the change immediately via
    /// [`AssessmentSession::live_score`].
    pub fn record_step_score(&mut self, index: usize, score: u8) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::InProgress)?;
        if score > FULL_SCORE {
            return Err(SessionError::InvalidScore(score));
        }
        // InProgress implies an active assessment.
        let Some(active) = self.active.as_mut() else {
            return Err(SessionError::WrongPhase {
                expected: SessionPhase::InProgress.name(),
                actual: SessionPhase::Configuring.name(),
            });
        };
        let total = active.checklist.steps.len();
        if index >= total {
            return Err(SessionError::StepOutOfRange { index, total });
        }
        active.scores.insert(index, score);
        Ok(())
    }

    /// The live score sheet for the running assessment, recomputed from
    /// the current step mapping. `None` while `Configuring`.
    pub fn live_score(&self) -> Option<ScoreSheet> {
        self.active
            .as_ref()
            .map(|a| scoring::score_steps(&a.scores, a.checklist.steps.len()))
    }

    /// The checklist being graded, while a session is live.
    pub fn active_checklist(&self) -> Option<&Checklist> {
        self.active.as_ref().map(|a| &a.checklist)
    }

    /// `InProgress → PendingVerification`. Re-checks that the snapshotted
    /// selections still resolve against current roster data, then opens
    /// the verification challenge bound to the assessor's stored PIN.
    pub fn request_finalize(&mut self, roster: &Roster) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::InProgress)?;
        let Some(active) = self.active.as_ref() else {
            return Err(SessionError::WrongPhase {
                expected: SessionPhase::InProgress.name(),
                actual: SessionPhase::Configuring.name(),
            });
        };

        if roster.find_student(&active.student.id).is_none() {
            return Err(SessionError::UnknownStudent(active.student.id.clone()));
        }
        if roster.find_checklist(&active.checklist.id).is_none() {
            return Err(SessionError::UnknownChecklist(active.checklist.id.clone()));
        }
        if roster.find_assessor(&active.assessor.id).is_none() {
            return Err(SessionError::UnknownAssessor(active.assessor.id.clone()));
        }

        self.verifying = true;
        self.verification_error = None;
        Ok(())
    }

    /// `PendingVerification → InProgress` without submitting: dismiss the
    /// verification challenge and keep scoring.
    pub fn cancel_verification(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::PendingVerification)?;
        self.verifying = false;
        self.verification_error = None;
        Ok(())
    }

    /// Submit the assessor's PIN. Exact, case-sensitive comparison against
    /// the stored verification code.
    ///
    /// On mismatch the session stays in `PendingVerification` with a
    /// visible error and no data loss; there is no lockout or retry limit.
    /// On match this builds the immutable [`Assessment`] record, stops the
    /// elapsed counter, resets the session to `Configuring`, and returns
    /// the record for the caller to hand to its store. The record is final
    /// from this moment regardless of what persistence later says.
    pub fn submit_pin(&mut self, pin: &str) -> Result<Assessment, SessionError> {
        self.expect_phase(SessionPhase::PendingVerification)?;
        let Some(active) = self.active.as_ref() else {
            return Err(SessionError::WrongPhase {
                expected: SessionPhase::PendingVerification.name(),
                actual: SessionPhase::Configuring.name(),
            });
        };

        if pin != active.assessor.verification_code {
            self.verification_error = Some("Incorrect PIN. Please try again.".to_string());
            return Err(SessionError::VerificationFailed);
        }

        let Some(active) = self.active.take() else {
            return Err(SessionError::WrongPhase {
                expected: SessionPhase::PendingVerification.name(),
                actual: SessionPhase::Configuring.name(),
            });
        };
        self.verifying = false;
        active.timer.stop();

        let total_steps = active.checklist.steps.len();
        let sheet = scoring::score_steps(&active.scores, total_steps);

        let record = Assessment {
            id: Uuid::new_v4(),
            student_id: active.student.id,
            checklist_id: active.checklist.id,
            checklist_title: active.checklist.title,
            student_name: active.student.name,
            assessor_name: active.assessor.name,
            completed_step_indices: sheet.completed_indices,
            step_scores: sheet.step_scores,
            total_steps,
            score: sheet.percentage,
            timestamp: Utc::now(),
        };

        tracing::info!(
            student = %record.student_name,
            checklist = %record.checklist_title,
            score = record.score,
            "assessment finalized"
        );

        self.reset_selections();
        Ok(record)
    }

    /// Error message from the last failed PIN attempt, if any.
    pub fn verification_error(&self) -> Option<&str> {
        self.verification_error.as_deref()
    }

    /// Leave the session. While `InProgress` or `PendingVerification` this
    /// discards the score mapping and elapsed time irreversibly, so it
    /// refuses without `confirmed`. Cancels the elapsed counter and
    /// releases the navigation guard.
    pub fn abandon(&mut self, confirmed: bool) -> Result<(), SessionError> {
        if self.active.is_some() && !confirmed {
            return Err(SessionError::ConfirmationRequired);
        }
        if let Some(active) = self.active.take() {
            active.timer.stop();
            tracing::debug!(checklist = %active.checklist.title, "assessment abandoned");
        }
        self.verifying = false;
        self.reset_selections();
        Ok(())
    }

    fn reset_selections(&mut self) {
        self.selected_student = None;
        self.selected_checklist = None;
        self.selected_assessor = None;
        self.checklist_year_filter = None;
        self.verification_error = None;
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        let actual = self.phase();
        if actual != expected {
            return Err(SessionError::WrongPhase {
                expected: expected.name(),
                actual: actual.name(),
            });
        }
        Ok(())
    }
}

/// Rank checklists by historical usage for the quick-select shortcut.
///
/// Usage count is the number of existing assessment records per checklist,
/// descending; ties keep roster order (stable sort). At most the top 4 are
/// returned and only checklists used at least once appear.
pub fn popular_checklists<'a>(
    checklists: &'a [Checklist],
    assessments: &[Assessment],
) -> Vec<(&'a Checklist, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in assessments {
        *counts.entry(record.checklist_id.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&Checklist, usize)> = checklists
        .iter()
        .map(|c| (c, counts.get(c.id.as_str()).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(4);
    ranked.retain(|(_, count)| *count > 0);
    ranked
}
