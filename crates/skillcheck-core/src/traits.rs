//! The data-access collaborator seam.
//!
//! The core never owns persistence: roster entities flow in through
//! [`RecordStore`] snapshots refreshed by the caller, and finalized
//! assessments flow back out through `create_assessment`. Implementations
//! live in the `skillcheck-store` crate.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Assessment, Assessor, Checklist, OsceSession, Student, Subject};

/// External store of roster entities and finalized records.
///
/// List methods return read-only snapshots; the core never caches them and
/// recomputes derived views per query. `create_assessment` is invoked
/// exactly once per successful finalize and its failure does not roll back
/// the already-final local record (optimistic-write semantics).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError>;

    async fn list_checklists(&self) -> Result<Vec<Checklist>, StoreError>;

    async fn list_assessors(&self) -> Result<Vec<Assessor>, StoreError>;

    async fn list_assessments(&self) -> Result<Vec<Assessment>, StoreError>;

    /// Persist one finalized assessment record.
    async fn create_assessment(&self, record: &Assessment) -> Result<(), StoreError>;

    /// Load the saved OSCE session hierarchy.
    async fn list_osce_sessions(&self) -> Result<Vec<OsceSession>, StoreError>;

    /// Replace the saved OSCE session hierarchy with the planner's current
    /// state. Last-writer-wins; no concurrent-editing guarantee is made.
    async fn save_osce_sessions(&self, sessions: &[OsceSession]) -> Result<(), StoreError>;
}

/// A loaded snapshot of the roster collections an assessment session
/// resolves selections against.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub students: Vec<Student>,
    pub subjects: Vec<Subject>,
    pub checklists: Vec<Checklist>,
    pub assessors: Vec<Assessor>,
}

impl Roster {
    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_checklist(&self, id: &str) -> Option<&Checklist> {
        self.checklists.iter().find(|c| c.id == id)
    }

    pub fn find_assessor(&self, id: &str) -> Option<&Assessor> {
        self.assessors.iter().find(|a| a.id == id)
    }

    pub fn find_subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Fetch all four roster collections from a store in one call.
    pub async fn load(store: &dyn RecordStore) -> Result<Self, StoreError> {
        Ok(Self {
            students: store.list_students().await?,
            subjects: store.list_subjects().await?,
            checklists: store.list_checklists().await?,
            assessors: store.list_assessors().await?,
        })
    }
}
