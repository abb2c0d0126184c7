//! Storage boundary for simulations and their child records.
//!
//! The projection engine and versioning manager talk to storage only through
//! `SimulationStore`; concrete backends (SQL, in-memory) live behind it.
//! Ownership checks chain through the client to the advisor, and version
//! commits are the single atomic write unit.

mod memory;

use uuid::Uuid;

pub use memory::InMemoryStore;

use crate::error::Result;
use crate::model::{AiAnalysis, Asset, Event, Insurance, Simulation};

/// A simulation together with all of its owned child records
#[derive(Debug, Clone)]
pub struct SimulationBundle {
    pub simulation: Simulation,
    pub assets: Vec<Asset>,
    pub events: Vec<Event>,
    pub insurances: Vec<Insurance>,
}

/// Writes applied by [`SimulationStore::commit_version`] as one atomic unit
#[derive(Debug, Clone)]
pub struct VersionPlan {
    /// Simulation to mark legacy alongside the insert, if any
    pub mark_legacy: Option<Uuid>,

    /// New simulation row plus its cloned children
    pub bundle: SimulationBundle,
}

pub trait SimulationStore: Send + Sync {
    /// Load a simulation with its children, checking ownership through the
    /// client chain. A missing row and a foreign row both surface as
    /// `NotFound`.
    fn load_owned(&self, simulation_id: Uuid, advisor_id: Uuid) -> Result<SimulationBundle>;

    /// Apply a version plan atomically: the legacy-flag update and the full
    /// new bundle are all persisted, or none of it is.
    fn commit_version(&self, plan: VersionPlan) -> Result<SimulationBundle>;

    /// Non-legacy simulations for a client, most recently updated first
    fn list_current(&self, client_id: Uuid) -> Result<Vec<Simulation>>;

    /// Append one sensitivity-analysis result
    fn append_analysis(&self, analysis: AiAnalysis) -> Result<()>;

    /// Latest analysis by creation time, if any
    fn latest_analysis(&self, simulation_id: Uuid) -> Result<Option<AiAnalysis>>;
}
