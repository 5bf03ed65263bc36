//! In-memory store for testing and embedded use.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillcheck_core::error::StoreError;
use skillcheck_core::model::{Assessment, Assessor, Checklist, OsceSession, Student, Subject};
use skillcheck_core::traits::RecordStore;

/// A seeded in-memory record store.
///
/// Tracks how many times `create_assessment` was called and supports
/// injecting a one-shot failure, so callers can exercise the
/// persistence-warning path (a finalized record stays authoritative even
/// when the store refuses it).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    create_calls: AtomicU32,
    fail_next_create: AtomicBool,
}

#[derive(Default)]
struct Collections {
    students: Vec<Student>,
    subjects: Vec<Subject>,
    checklists: Vec<Checklist>,
    assessors: Vec<Assessor>,
    assessments: Vec<Assessment>,
    osce_sessions: Vec<OsceSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with roster collections.
    pub fn with_roster(
        students: Vec<Student>,
        subjects: Vec<Subject>,
        checklists: Vec<Checklist>,
        assessors: Vec<Assessor>,
    ) -> Self {
        Self {
            inner: Mutex::new(Collections {
                students,
                subjects,
                checklists,
                assessors,
                assessments: Vec::new(),
                osce_sessions: Vec::new(),
            }),
            create_calls: AtomicU32::new(0),
            fail_next_create: AtomicBool::new(false),
        }
    }

    /// Number of `create_assessment` calls made against this store.
    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::Relaxed)
    }

    /// Make the next `create_assessment` call fail with a rejection.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.inner.lock().unwrap().students.clone())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        Ok(self.inner.lock().unwrap().subjects.clone())
    }

    async fn list_checklists(&self) -> Result<Vec<Checklist>, StoreError> {
        Ok(self.inner.lock().unwrap().checklists.clone())
    }

    async fn list_assessors(&self) -> Result<Vec<Assessor>, StoreError> {
        Ok(self.inner.lock().unwrap().assessors.clone())
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>, StoreError> {
        Ok(self.inner.lock().unwrap().assessments.clone())
    }

    async fn create_assessment(&self, record: &Assessment) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_next_create.swap(false, Ordering::Relaxed) {
            return Err(StoreError::Rejected("injected failure".into()));
        }
        self.inner.lock().unwrap().assessments.push(record.clone());
        Ok(())
    }

    async fn list_osce_sessions(&self) -> Result<Vec<OsceSession>, StoreError> {
        Ok(self.inner.lock().unwrap().osce_sessions.clone())
    }

    async fn save_osce_sessions(&self, sessions: &[OsceSession]) -> Result<(), StoreError> {
        self.inner.lock().unwrap().osce_sessions = sessions.to_vec();
        Ok(())
    }
}
