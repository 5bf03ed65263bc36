//! OSCE session planning: the Session → Circuit → Station hierarchy.
//!
//! [`OscePlanner`] owns the full hierarchy and exposes the structural
//! mutations. Every operation looks entities up by identity and returns
//! [`OsceError`] when the identity does not resolve; an error return means
//! nothing changed.

use chrono::NaiveTime;
use uuid::Uuid;

use crate::error::OsceError;
use crate::model::{Checklist, OsceCircuit, OsceSession, OsceStation, SessionStatus};

/// Snapshot title stored on a station whose checklist could not be
/// resolved at insertion time.
const UNKNOWN_CHECKLIST: &str = "Unknown";

/// Minutes per rotation slot in the derived schedule view.
const SLOT_MINUTES: u32 = 10;

/// Owns and mutates the OSCE session hierarchy.
///
/// The planner also tracks which session is currently in focus (the one an
/// operator is viewing); deleting the focused session clears the focus.
#[derive(Debug, Default)]
pub struct OscePlanner {
    sessions: Vec<OsceSession>,
    focus: Option<Uuid>,
}

impl OscePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a planner around a previously saved hierarchy.
    pub fn from_sessions(sessions: Vec<OsceSession>) -> Self {
        Self {
            sessions,
            focus: None,
        }
    }

    pub fn sessions(&self) -> &[OsceSession] {
        &self.sessions
    }

    pub fn session(&self, id: Uuid) -> Option<&OsceSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn focus(&self) -> Option<Uuid> {
        self.focus
    }

    /// Focus an existing session for viewing.
    pub fn set_focus(&mut self, id: Uuid) -> Result<(), OsceError> {
        if self.session(id).is_none() {
            return Err(OsceError::SessionNotFound(id));
        }
        self.focus = Some(id);
        Ok(())
    }

    /// Create a new exam session with no circuits, status `upcoming`.
    pub fn create_session(
        &mut self,
        title: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Uuid {
        let session = OsceSession {
            id: Uuid::new_v4(),
            title: title.into(),
            date: date.into(),
            start_time: start_time.into(),
            status: SessionStatus::Upcoming,
            circuits: Vec::new(),
        };
        let id = session.id;
        self.sessions.push(session);
        id
    }

    /// Remove a session and everything under it. Destructive; callers
    /// confirm with the operator before invoking. Clears the focus if the
    /// focused session is the one removed.
    pub fn delete_session(&mut self, id: Uuid) -> Result<(), OsceError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(OsceError::SessionNotFound(id))?;
        self.sessions.remove(index);
        if self.focus == Some(id) {
            self.focus = None;
        }
        Ok(())
    }

    /// Update a session's lifecycle status.
    pub fn set_status(&mut self, id: Uuid, status: SessionStatus) -> Result<(), OsceError> {
        self.session_mut(id)?.status = status;
        Ok(())
    }

    /// Append a circuit with an empty station list.
    pub fn add_circuit(
        &mut self,
        session_id: Uuid,
        title: impl Into<String>,
    ) -> Result<Uuid, OsceError> {
        let session = self.session_mut(session_id)?;
        let circuit = OsceCircuit {
            id: Uuid::new_v4(),
            title: title.into(),
            stations: Vec::new(),
        };
        let id = circuit.id;
        session.circuits.push(circuit);
        Ok(id)
    }

    /// Remove a circuit and all its stations (cascade). Destructive;
    /// callers confirm with the operator first.
    pub fn delete_circuit(&mut self, session_id: Uuid, circuit_id: Uuid) -> Result<(), OsceError> {
        let session = self.session_mut(session_id)?;
        let index = session
            .circuits
            .iter()
            .position(|c| c.id == circuit_id)
            .ok_or(OsceError::CircuitNotFound(circuit_id))?;
        session.circuits.remove(index);
        Ok(())
    }

    /// Append a station to a circuit. `number` is the circuit's current
    /// station count plus one at insertion time; the grading checklist's
    /// title is snapshotted, falling back to a placeholder when the id
    /// does not resolve.
    #[allow(clippy::too_many_arguments)]
    pub fn add_station(
        &mut self,
        session_id: Uuid,
        circuit_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        duration_minutes: u32,
        checklist_id: impl Into<String>,
        checklists: &[Checklist],
    ) -> Result<Uuid, OsceError> {
        let checklist_id = checklist_id.into();
        let checklist_title = checklists
            .iter()
            .find(|c| c.id == checklist_id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| UNKNOWN_CHECKLIST.to_string());

        let circuit = self.circuit_mut(session_id, circuit_id)?;
        let station = OsceStation {
            id: Uuid::new_v4(),
            number: circuit.stations.len() as u32 + 1,
            title: title.into(),
            description: description.into(),
            duration_minutes,
            checklist_id,
            checklist_title,
        };
        let id = station.id;
        circuit.stations.push(station);
        Ok(id)
    }

    /// Remove a station from its circuit. Remaining stations keep their
    /// original `number`; listings order by array position instead.
    pub fn delete_station(
        &mut self,
        session_id: Uuid,
        circuit_id: Uuid,
        station_id: Uuid,
    ) -> Result<(), OsceError> {
        let circuit = self.circuit_mut(session_id, circuit_id)?;
        let index = circuit
            .stations
            .iter()
            .position(|s| s.id == station_id)
            .ok_or(OsceError::StationNotFound(station_id))?;
        circuit.stations.remove(index);
        Ok(())
    }

    /// Generate the display-only rotation matrix for a session.
    pub fn schedule_matrix(&self, session_id: Uuid) -> Result<ScheduleMatrix, OsceError> {
        let session = self
            .session(session_id)
            .ok_or(OsceError::SessionNotFound(session_id))?;
        Ok(ScheduleMatrix::build(session))
    }

    fn session_mut(&mut self, id: Uuid) -> Result<&mut OsceSession, OsceError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(OsceError::SessionNotFound(id))
    }

    fn circuit_mut(
        &mut self,
        session_id: Uuid,
        circuit_id: Uuid,
    ) -> Result<&mut OsceCircuit, OsceError> {
        self.session_mut(session_id)?
            .circuits
            .iter_mut()
            .find(|c| c.id == circuit_id)
            .ok_or(OsceError::CircuitNotFound(circuit_id))
    }
}

/// Derived, display-only rotation schedule: fixed 10-minute slots against
/// the flattened list of all stations across the session's circuits.
///
/// Candidate assignments are illustrative placeholders; no rotation
/// assignment is computed or persisted. A real rotation algorithm is a
/// separate feature.
#[derive(Debug, Clone)]
pub struct ScheduleMatrix {
    /// Column labels, one per station: "Circuit — St N" by array position.
    pub columns: Vec<String>,
    /// Fixed time slot rows.
    pub slots: Vec<ScheduleSlot>,
}

/// One rotation time slot.
#[derive(Debug, Clone)]
pub struct ScheduleSlot {
    /// e.g. "09:00 - 09:10".
    pub label: String,
    /// Placeholder candidate per column.
    pub assignments: Vec<String>,
}

impl ScheduleMatrix {
    fn build(session: &OsceSession) -> Self {
        let columns: Vec<String> = session
            .circuits
            .iter()
            .flat_map(|circuit| {
                circuit
                    .stations
                    .iter()
                    .enumerate()
                    .map(move |(index, _)| format!("{} - St {}", circuit.title, index + 1))
            })
            .collect();

        let start = NaiveTime::parse_from_str(&session.start_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(9, 0, 0).expect("valid literal time"));

        let slots = ["Student A", "Student B"]
            .iter()
            .enumerate()
            .map(|(slot, candidate)| {
                let from = start + chrono::Duration::minutes(i64::from(SLOT_MINUTES * slot as u32));
                let to = from + chrono::Duration::minutes(i64::from(SLOT_MINUTES));
                ScheduleSlot {
                    label: format!("{} - {}", from.format("%H:%M"), to.format("%H:%M")),
                    assignments: vec![candidate.to_string(); columns.len()],
                }
            })
            .collect();

        Self { columns, slots }
    }

    /// True when the session has no stations to rotate through.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklists() -> Vec<Checklist> {
        vec![Checklist {
            id: "c1".into(),
            title: "Abdominal Exam".into(),
            subject_id: "sub1".into(),
            subject: "Internal Medicine".into(),
            year_level: "4".into(),
            steps: vec!["Inspect".into(), "Palpate".into()],
        }]
    }

    fn planner_with_circuit() -> (OscePlanner, Uuid, Uuid) {
        let mut planner = OscePlanner::new();
        let session = planner.create_session("Final OSCE", "2026-03-14", "09:00");
        let circuit = planner.add_circuit(session, "Circuit A").unwrap();
        (planner, session, circuit)
    }

    #[test]
    fn create_session_starts_upcoming_and_empty() {
        let mut planner = OscePlanner::new();
        let id = planner.create_session("Final OSCE", "2026-03-14", "09:00");
        let session = planner.session(id).unwrap();
        assert_eq!(session.status, SessionStatus::Upcoming);
        assert!(session.circuits.is_empty());
    }

    #[test]
    fn delete_session_clears_focus() {
        let mut planner = OscePlanner::new();
        let id = planner.create_session("Final OSCE", "2026-03-14", "09:00");
        planner.set_focus(id).unwrap();

        planner.delete_session(id).unwrap();
        assert!(planner.focus().is_none());
        assert!(planner.sessions().is_empty());
    }

    #[test]
    fn missing_identities_are_errors_and_noops() {
        let (mut planner, session, _) = planner_with_circuit();
        let ghost = Uuid::new_v4();

        assert!(matches!(
            planner.add_circuit(ghost, "X"),
            Err(OsceError::SessionNotFound(_))
        ));
        assert!(matches!(
            planner.delete_circuit(session, ghost),
            Err(OsceError::CircuitNotFound(_))
        ));
        assert_eq!(planner.session(session).unwrap().circuits.len(), 1);
    }

    #[test]
    fn station_numbers_assigned_at_insertion() {
        let (mut planner, session, circuit) = planner_with_circuit();
        let lists = checklists();

        for title in ["History", "Examination", "Handover"] {
            planner
                .add_station(session, circuit, title, "", 10, "c1", &lists)
                .unwrap();
        }

        let stations = &planner.session(session).unwrap().circuits[0].stations;
        assert_eq!(
            stations.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(stations[0].checklist_title, "Abdominal Exam");
    }

    #[test]
    fn deleting_middle_station_does_not_renumber() {
        let (mut planner, session, circuit) = planner_with_circuit();
        let lists = checklists();

        let mut ids = Vec::new();
        for title in ["One", "Two", "Three"] {
            ids.push(
                planner
                    .add_station(session, circuit, title, "", 10, "c1", &lists)
                    .unwrap(),
            );
        }
        planner.delete_station(session, circuit, ids[1]).unwrap();

        let stations = &planner.session(session).unwrap().circuits[0].stations;
        assert_eq!(stations.len(), 2);
        // Stored numbers keep their insertion values; display order is the
        // array, so a listing shows positions 1 and 2 with numbers 1 and 3.
        assert_eq!(stations[0].number, 1);
        assert_eq!(stations[1].number, 3);
        assert_eq!(stations[1].title, "Three");
    }

    #[test]
    fn unresolvable_checklist_stores_placeholder() {
        let (mut planner, session, circuit) = planner_with_circuit();
        planner
            .add_station(session, circuit, "Mystery", "", 10, "gone", &[])
            .unwrap();

        let station = &planner.session(session).unwrap().circuits[0].stations[0];
        assert_eq!(station.checklist_title, "Unknown");
        assert_eq!(station.checklist_id, "gone");
    }

    #[test]
    fn delete_circuit_cascades_stations() {
        let (mut planner, session, circuit) = planner_with_circuit();
        let lists = checklists();
        planner
            .add_station(session, circuit, "One", "", 10, "c1", &lists)
            .unwrap();

        planner.delete_circuit(session, circuit).unwrap();
        assert!(planner.session(session).unwrap().circuits.is_empty());
    }

    #[test]
    fn schedule_matrix_flattens_stations_across_circuits() {
        let (mut planner, session, circuit_a) = planner_with_circuit();
        let circuit_b = planner.add_circuit(session, "Circuit B").unwrap();
        let lists = checklists();

        planner
            .add_station(session, circuit_a, "One", "", 10, "c1", &lists)
            .unwrap();
        planner
            .add_station(session, circuit_a, "Two", "", 10, "c1", &lists)
            .unwrap();
        planner
            .add_station(session, circuit_b, "Three", "", 10, "c1", &lists)
            .unwrap();

        let matrix = planner.schedule_matrix(session).unwrap();
        assert_eq!(
            matrix.columns,
            vec!["Circuit A - St 1", "Circuit A - St 2", "Circuit B - St 1"]
        );
        assert_eq!(matrix.slots.len(), 2);
        assert_eq!(matrix.slots[0].label, "09:00 - 09:10");
        assert_eq!(matrix.slots[1].label, "09:10 - 09:20");
        assert_eq!(matrix.slots[0].assignments.len(), 3);
    }

    #[test]
    fn schedule_matrix_empty_session() {
        let mut planner = OscePlanner::new();
        let id = planner.create_session("Empty", "2026-03-14", "not-a-time");
        let matrix = planner.schedule_matrix(id).unwrap();
        assert!(matrix.is_empty());
        // Unparseable start times fall back to 09:00.
        assert_eq!(matrix.slots[0].label, "09:00 - 09:10");
    }

    #[test]
    fn set_status_advances_lifecycle() {
        let mut planner = OscePlanner::new();
        let id = planner.create_session("Final OSCE", "2026-03-14", "09:00");
        planner.set_status(id, SessionStatus::Active).unwrap();
        assert_eq!(planner.session(id).unwrap().status, SessionStatus::Active);
    }
}
