//! JSON file store: one file per collection under a data directory.
//!
//! The reference persistence collaborator. Reads return whatever is on
//! disk right now (missing files read as empty collections); writes
//! rewrite the whole file. Last-writer-wins, which is acceptable at
//! classroom scale; no durability guarantee beyond the filesystem's.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use skillcheck_core::error::StoreError;
use skillcheck_core::model::{Assessment, Assessor, Checklist, OsceSession, Student, Subject};
use skillcheck_core::traits::RecordStore;

/// File-backed store rooted at a data directory.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_collection<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(self.dir.join(file), json)?;
        Ok(())
    }

    /// Seed roster collections onto disk (used by `skillcheck init` and
    /// tests; rosters are normally authored as TOML and imported).
    pub fn write_roster(
        &self,
        students: &[Student],
        subjects: &[Subject],
        checklists: &[Checklist],
        assessors: &[Assessor],
    ) -> Result<(), StoreError> {
        self.write_collection("students.json", students)?;
        self.write_collection("subjects.json", subjects)?;
        self.write_collection("checklists.json", checklists)?;
        self.write_collection("assessors.json", assessors)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonStore {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        self.read_collection("students.json")
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        self.read_collection("subjects.json")
    }

    async fn list_checklists(&self) -> Result<Vec<Checklist>, StoreError> {
        self.read_collection("checklists.json")
    }

    async fn list_assessors(&self) -> Result<Vec<Assessor>, StoreError> {
        self.read_collection("assessors.json")
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>, StoreError> {
        self.read_collection("assessments.json")
    }

    async fn create_assessment(&self, record: &Assessment) -> Result<(), StoreError> {
        let mut assessments: Vec<Assessment> = self.read_collection("assessments.json")?;
        assessments.push(record.clone());
        self.write_collection("assessments.json", &assessments)?;
        tracing::debug!(id = %record.id, "assessment persisted");
        Ok(())
    }

    async fn list_osce_sessions(&self) -> Result<Vec<OsceSession>, StoreError> {
        self.read_collection("osce_sessions.json")
    }

    async fn save_osce_sessions(&self, sessions: &[OsceSession]) -> Result<(), StoreError> {
        self.write_collection("osce_sessions.json", sessions)
    }
}
