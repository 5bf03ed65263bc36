//! The `skillcheck osce` subcommands: exam session planning.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use skillcheck_core::model::SessionStatus;
use skillcheck_core::osce::OscePlanner;
use skillcheck_core::traits::RecordStore;
use skillcheck_store::JsonStore;

#[derive(Subcommand)]
pub enum OsceCommand {
    /// List exam sessions
    List {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Create a new exam session
    Create {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// e.g. "Year 3 Sem 1 Final OSCE"
        #[arg(long)]
        title: String,

        /// Exam date, e.g. "2026-03-14"
        #[arg(long)]
        date: String,

        /// Start time, e.g. "09:00"
        #[arg(long, default_value = "09:00")]
        time: String,
    },

    /// Show one session's circuits and stations
    Show {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Session id
        #[arg(long)]
        session: String,
    },

    /// Update a session's lifecycle status
    SetStatus {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        /// upcoming, active or completed
        #[arg(long)]
        status: String,
    },

    /// Add a circuit to a session
    AddCircuit {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        /// e.g. "Circuit A"
        #[arg(long)]
        title: String,
    },

    /// Add a station to a circuit
    AddStation {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        #[arg(long)]
        circuit: String,

        /// e.g. "Abdominal Exam"
        #[arg(long)]
        title: String,

        /// Scenario instructions for the candidate
        #[arg(long, default_value = "")]
        description: String,

        /// Station duration in minutes
        #[arg(long, default_value = "10")]
        duration: u32,

        /// Checklist id used for grading at this station
        #[arg(long)]
        checklist: String,
    },

    /// Delete an exam session and everything in it
    DeleteSession {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        /// Confirm the destructive delete
        #[arg(long)]
        yes: bool,
    },

    /// Delete a circuit and all its stations
    DeleteCircuit {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        #[arg(long)]
        circuit: String,

        /// Confirm the destructive delete
        #[arg(long)]
        yes: bool,
    },

    /// Remove a station from its circuit
    DeleteStation {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,

        #[arg(long)]
        circuit: String,

        #[arg(long)]
        station: String,
    },

    /// Print the rotation schedule matrix
    Schedule {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        session: String,
    },
}

pub async fn execute(command: OsceCommand) -> Result<()> {
    match command {
        OsceCommand::List { data_dir } => {
            let (planner, _) = load_planner(&data_dir).await?;
            if planner.sessions().is_empty() {
                println!("No exams scheduled.");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec!["Id", "Title", "Date", "Start", "Status", "Circuits"]);
            for session in planner.sessions() {
                table.add_row(vec![
                    Cell::new(session.id),
                    Cell::new(&session.title),
                    Cell::new(&session.date),
                    Cell::new(&session.start_time),
                    Cell::new(session.status),
                    Cell::new(session.circuits.len()),
                ]);
            }
            println!("{table}");
            Ok(())
        }

        OsceCommand::Create {
            data_dir,
            title,
            date,
            time,
        } => {
            let (mut planner, store) = load_planner(&data_dir).await?;
            let id = planner.create_session(title, date, time);
            save_planner(&store, &planner).await?;
            println!("Created session {id}");
            Ok(())
        }

        OsceCommand::Show { data_dir, session } => {
            let (planner, _) = load_planner(&data_dir).await?;
            let id = parse_id(&session)?;
            let session = planner
                .session(id)
                .with_context(|| format!("OSCE session not found: {id}"))?;

            println!(
                "{} — {} at {} [{}]",
                session.title, session.date, session.start_time, session.status
            );
            for circuit in &session.circuits {
                println!("\n{} ({} stations)", circuit.title, circuit.stations.len());
                for (position, station) in circuit.stations.iter().enumerate() {
                    println!(
                        "  {}. {} — {} min, checklist: {} [id {}]",
                        position + 1,
                        station.title,
                        station.duration_minutes,
                        station.checklist_title,
                        station.id
                    );
                }
            }
            Ok(())
        }

        OsceCommand::SetStatus {
            data_dir,
            session,
            status,
        } => {
            let (mut planner, store) = load_planner(&data_dir).await?;
            let id = parse_id(&session)?;
            let status = SessionStatus::from_str(&status).map_err(|e| anyhow::anyhow!(e))?;
            planner.set_status(id, status)?;
            save_planner(&store, &planner).await?;
            println!("Session {id} is now {status}");
            Ok(())
        }

        OsceCommand::AddCircuit {
            data_dir,
            session,
            title,
        } => {
            let (mut planner, store) = load_planner(&data_dir).await?;
            let id = planner.add_circuit(parse_id(&session)?, title)?;
            save_planner(&store, &planner).await?;
            println!("Added circuit {id}");
            Ok(())
        }

        OsceCommand::AddStation {
            data_dir,
            session,
            circuit,
            title,
            description,
            duration,
            checklist,
        } => {
            let store = JsonStore::new(&data_dir);
            let checklists = store.list_checklists().await?;
            let mut planner = OscePlanner::from_sessions(store.list_osce_sessions().await?);

            let id = planner.add_station(
                parse_id(&session)?,
                parse_id(&circuit)?,
                title,
                description,
                duration,
                checklist,
                &checklists,
            )?;
            save_planner(&store, &planner).await?;
            println!("Added station {id}");
            Ok(())
        }

        OsceCommand::DeleteSession {
            data_dir,
            session,
            yes,
        } => {
            anyhow::ensure!(yes, "deleting an exam session is destructive; pass --yes to confirm");
            let (mut planner, store) = load_planner(&data_dir).await?;
            let id = parse_id(&session)?;
            planner.delete_session(id)?;
            save_planner(&store, &planner).await?;
            println!("Deleted session {id}");
            Ok(())
        }

        OsceCommand::DeleteCircuit {
            data_dir,
            session,
            circuit,
            yes,
        } => {
            anyhow::ensure!(yes, "deleting a circuit is destructive; pass --yes to confirm");
            let (mut planner, store) = load_planner(&data_dir).await?;
            let circuit = parse_id(&circuit)?;
            planner.delete_circuit(parse_id(&session)?, circuit)?;
            save_planner(&store, &planner).await?;
            println!("Deleted circuit {circuit}");
            Ok(())
        }

        OsceCommand::DeleteStation {
            data_dir,
            session,
            circuit,
            station,
        } => {
            let (mut planner, store) = load_planner(&data_dir).await?;
            let station = parse_id(&station)?;
            planner.delete_station(parse_id(&session)?, parse_id(&circuit)?, station)?;
            save_planner(&store, &planner).await?;
            println!("Removed station {station}");
            Ok(())
        }

        OsceCommand::Schedule { data_dir, session } => {
            let (planner, _) = load_planner(&data_dir).await?;
            let matrix = planner.schedule_matrix(parse_id(&session)?)?;

            if matrix.is_empty() {
                println!("Configure stations to generate a schedule.");
                return Ok(());
            }

            let mut table = Table::new();
            let mut header = vec![Cell::new("Time Slot")];
            header.extend(matrix.columns.iter().map(Cell::new));
            table.set_header(header);
            for slot in &matrix.slots {
                let mut row = vec![Cell::new(&slot.label)];
                row.extend(slot.assignments.iter().map(Cell::new));
                table.add_row(row);
            }
            println!("{table}");
            Ok(())
        }
    }
}

async fn load_planner(data_dir: &Path) -> Result<(OscePlanner, JsonStore)> {
    let store = JsonStore::new(data_dir);
    let sessions = store.list_osce_sessions().await?;
    Ok((OscePlanner::from_sessions(sessions), store))
}

async fn save_planner(store: &JsonStore, planner: &OscePlanner) -> Result<()> {
    store.save_osce_sessions(planner.sessions()).await?;
    Ok(())
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("invalid id: {raw}"))
}
