//! Simulation version creation: supersession, named branches, and snapshots

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Simulation;
use crate::store::{SimulationBundle, SimulationStore, VersionPlan};

/// Creates new simulation versions from an existing one.
///
/// Two modes:
/// - hypothetical version: version is incremented and the children are
///   deep-cloned; an unnamed re-version additionally marks the source as
///   legacy, while a named branch leaves both scenarios active.
/// - current-situation snapshot: version resets to 1 and the start date
///   moves to today; the source is never touched.
///
/// All writes go through one atomic `commit_version` call. Two concurrent
/// calls against the same source can both commit; the last legacy-marking
/// write wins and no compare-and-swap is attempted.
pub struct VersioningManager {
    store: Arc<dyn SimulationStore>,
}

impl VersioningManager {
    pub fn new(store: Arc<dyn SimulationStore>) -> Self {
        Self { store }
    }

    /// Clone `simulation_id` into a new version owned by the same client.
    ///
    /// Returns the new simulation with its cloned children for immediate use
    /// by the caller.
    pub fn create_version(
        &self,
        simulation_id: Uuid,
        advisor_id: Uuid,
        new_name: Option<&str>,
        is_current_situation: bool,
    ) -> Result<SimulationBundle> {
        let original = self.store.load_owned(simulation_id, advisor_id)?;
        let source = &original.simulation;
        let now = Utc::now();

        let simulation = Simulation {
            id: Uuid::new_v4(),
            client_id: source.client_id,
            name: new_name.map(str::to_owned).unwrap_or_else(|| source.name.clone()),
            base_tax: source.base_tax,
            start_date: if is_current_situation {
                now.date_naive()
            } else {
                source.start_date
            },
            status: source.status,
            version: if is_current_situation {
                1
            } else {
                source.version + 1
            },
            is_legacy: false,
            parent_version_id: Some(source.id),
            created_at: now,
            updated_at: now,
        };
        let new_id = simulation.id;

        // An unnamed re-version supersedes its source; named branches and
        // snapshots leave it active.
        let mark_legacy =
            (!is_current_situation && new_name.is_none()).then_some(source.id);

        let bundle = SimulationBundle {
            simulation,
            assets: original
                .assets
                .iter()
                .map(|a| a.clone_for(new_id))
                .collect(),
            events: original
                .events
                .iter()
                .map(|e| e.clone_for(new_id))
                .collect(),
            insurances: original
                .insurances
                .iter()
                .map(|i| i.clone_for(new_id))
                .collect(),
        };

        debug!(
            "creating version {} of simulation {} (legacy mark: {})",
            bundle.simulation.version,
            source.id,
            mark_legacy.is_some()
        );

        self.store.commit_version(VersionPlan {
            mark_legacy,
            bundle,
        })
    }
}
