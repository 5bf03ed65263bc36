//! End-to-end session flow against the in-memory store: selection through
//! PIN verification, persistence, and the optimistic-write semantics when
//! the store refuses a record.

use skillcheck_core::model::{Assessor, Checklist, Student};
use skillcheck_core::session::AssessmentSession;
use skillcheck_core::traits::{RecordStore, Roster};
use skillcheck_store::MemoryStore;

fn seeded_store() -> MemoryStore {
    MemoryStore::with_roster(
        vec![Student {
            id: "s1".into(),
            name: "Amina Yusuf".into(),
            matric_number: "M1001".into(),
            group: "A".into(),
            year_level: "3".into(),
            email: None,
            phone_number: None,
        }],
        vec![],
        vec![Checklist {
            id: "c1".into(),
            title: "IV Cannulation".into(),
            subject_id: "sub1".into(),
            subject: "Clinical Skills".into(),
            year_level: "3".into(),
            steps: vec!["Wash hands".into(), "Insert cannula".into()],
        }],
        vec![Assessor {
            id: "a1".into(),
            name: "Dr. Bello".into(),
            verification_code: "4321".into(),
            role: None,
        }],
    )
}

async fn run_session(store: &MemoryStore) -> skillcheck_core::model::Assessment {
    let roster = Roster::load(store).await.unwrap();

    let mut session = AssessmentSession::new();
    session.select_student("s1");
    session.select_checklist("c1");
    session.select_assessor("a1");
    session.begin(&roster).unwrap();

    session.record_step_score(0, 2).unwrap();
    session.record_step_score(1, 1).unwrap();

    session.request_finalize(&roster).unwrap();
    session.submit_pin("4321").unwrap()
}

#[tokio::test]
async fn finalize_emits_exactly_one_record() {
    let store = seeded_store();
    let record = run_session(&store).await;

    assert_eq!(record.score, 75);
    store.create_assessment(&record).await.unwrap();

    let stored = store.list_assessments().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, record.id);
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn wrong_pin_never_reaches_the_store() {
    let store = seeded_store();
    let roster = Roster::load(&store).await.unwrap();

    let mut session = AssessmentSession::new();
    session.select_student("s1");
    session.select_checklist("c1");
    session.select_assessor("a1");
    session.begin(&roster).unwrap();
    session.request_finalize(&roster).unwrap();

    assert!(session.submit_pin("0000").is_err());
    session.abandon(true).unwrap();

    assert!(store.list_assessments().await.unwrap().is_empty());
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn store_rejection_does_not_unwind_the_record() {
    let store = seeded_store();
    let record = run_session(&store).await;

    store.fail_next_create();
    let persistence = store.create_assessment(&record).await;
    assert!(persistence.is_err());

    // The record is already final; nothing in it depends on the store's
    // verdict, and a retry by the caller goes through.
    assert_eq!(record.score, 75);
    store.create_assessment(&record).await.unwrap();
    assert_eq!(store.list_assessments().await.unwrap().len(), 1);
}
