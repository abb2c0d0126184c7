//! In-memory store backing tests and the CLI binaries.
//!
//! One mutex guards the whole dataset; `commit_version` validates the entire
//! plan before touching anything, so a failed commit leaves no partial
//! state.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::{SimulationBundle, SimulationStore, VersionPlan};
use crate::error::{Error, Result};
use crate::model::{AiAnalysis, Asset, Client, Event, Insurance, Simulation};

#[derive(Default)]
struct Inner {
    clients: Vec<Client>,
    simulations: Vec<Simulation>,
    assets: Vec<Asset>,
    events: Vec<Event>,
    insurances: Vec<Insurance>,
    analyses: Vec<AiAnalysis>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_client(&self, client: Client) {
        self.inner.lock().unwrap().clients.push(client);
    }

    pub fn insert_bundle(&self, bundle: SimulationBundle) {
        let mut inner = self.inner.lock().unwrap();
        inner.simulations.push(bundle.simulation);
        inner.assets.extend(bundle.assets);
        inner.events.extend(bundle.events);
        inner.insurances.extend(bundle.insurances);
    }

    /// Snapshot read of one simulation row, bypassing ownership checks.
    /// Intended for seeding flows and assertions, not for service code.
    pub fn simulation(&self, id: Uuid) -> Option<Simulation> {
        self.inner
            .lock()
            .unwrap()
            .simulations
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }
}

impl SimulationStore for InMemoryStore {
    fn load_owned(&self, simulation_id: Uuid, advisor_id: Uuid) -> Result<SimulationBundle> {
        let inner = self.inner.lock().unwrap();

        let simulation = inner
            .simulations
            .iter()
            .find(|s| s.id == simulation_id)
            .filter(|s| {
                inner
                    .clients
                    .iter()
                    .any(|c| c.id == s.client_id && c.advisor_id == advisor_id)
            })
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("simulation {}", simulation_id)))?;

        Ok(SimulationBundle {
            assets: inner
                .assets
                .iter()
                .filter(|a| a.simulation_id == simulation_id)
                .cloned()
                .collect(),
            events: inner
                .events
                .iter()
                .filter(|e| e.simulation_id == simulation_id)
                .cloned()
                .collect(),
            insurances: inner
                .insurances
                .iter()
                .filter(|i| i.simulation_id == simulation_id)
                .cloned()
                .collect(),
            simulation,
        })
    }

    fn commit_version(&self, plan: VersionPlan) -> Result<SimulationBundle> {
        let mut inner = self.inner.lock().unwrap();

        // Validate the whole plan up front; nothing is mutated on failure.
        if !inner
            .clients
            .iter()
            .any(|c| c.id == plan.bundle.simulation.client_id)
        {
            return Err(Error::Storage(format!(
                "unknown client {}",
                plan.bundle.simulation.client_id
            )));
        }
        if inner
            .simulations
            .iter()
            .any(|s| s.id == plan.bundle.simulation.id)
        {
            return Err(Error::Storage(format!(
                "duplicate simulation {}",
                plan.bundle.simulation.id
            )));
        }
        let legacy_index = match plan.mark_legacy {
            Some(id) => Some(
                inner
                    .simulations
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or_else(|| Error::Storage(format!("unknown simulation {}", id)))?,
            ),
            None => None,
        };

        if let Some(index) = legacy_index {
            inner.simulations[index].is_legacy = true;
            inner.simulations[index].updated_at = Utc::now();
        }
        inner.simulations.push(plan.bundle.simulation.clone());
        inner.assets.extend(plan.bundle.assets.iter().cloned());
        inner.events.extend(plan.bundle.events.iter().cloned());
        inner.insurances.extend(plan.bundle.insurances.iter().cloned());

        Ok(plan.bundle)
    }

    fn list_current(&self, client_id: Uuid) -> Result<Vec<Simulation>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Simulation> = inner
            .simulations
            .iter()
            .filter(|s| s.client_id == client_id && !s.is_legacy)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    fn append_analysis(&self, analysis: AiAnalysis) -> Result<()> {
        self.inner.lock().unwrap().analyses.push(analysis);
        Ok(())
    }

    fn latest_analysis(&self, simulation_id: Uuid) -> Result<Option<AiAnalysis>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .analyses
            .iter()
            .filter(|a| a.simulation_id == simulation_id)
            .max_by_key(|a| a.created_at)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::{AssetKind, LifeStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_store() -> (InMemoryStore, Uuid, Simulation) {
        let store = InMemoryStore::new();
        let advisor_id = Uuid::new_v4();
        let client = Client::new(advisor_id, "Silva family", date(1975, 3, 14));
        let client_id = client.id;
        store.insert_client(client);

        let simulation = Simulation::new(
            client_id,
            "Estate plan",
            dec!(0.04),
            date(2024, 1, 1),
            LifeStatus::Alive,
        );
        let asset = Asset::new(
            simulation.id,
            "Brokerage",
            AssetKind::Financial,
            dec!(2500000),
            date(2023, 12, 31),
        );
        store.insert_bundle(SimulationBundle {
            simulation: simulation.clone(),
            assets: vec![asset],
            events: vec![],
            insurances: vec![],
        });

        (store, advisor_id, simulation)
    }

    #[test]
    fn test_load_owned_checks_the_advisor_chain() {
        let (store, advisor_id, simulation) = seeded_store();

        let bundle = store.load_owned(simulation.id, advisor_id).unwrap();
        assert_eq!(bundle.simulation.id, simulation.id);
        assert_eq!(bundle.assets.len(), 1);

        let err = store
            .load_owned(simulation.id, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = store.load_owned(Uuid::new_v4(), advisor_id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_commit_version_is_all_or_nothing() {
        let (store, advisor_id, simulation) = seeded_store();

        let mut clone = Simulation::new(
            simulation.client_id,
            "Estate plan",
            dec!(0.04),
            date(2024, 1, 1),
            LifeStatus::Alive,
        );
        clone.version = 2;
        clone.parent_version_id = Some(simulation.id);
        let clone_id = clone.id;

        // Legacy target does not exist: the commit must fail without
        // inserting the new row.
        let err = store
            .commit_version(VersionPlan {
                mark_legacy: Some(Uuid::new_v4()),
                bundle: SimulationBundle {
                    simulation: clone.clone(),
                    assets: vec![],
                    events: vec![],
                    insurances: vec![],
                },
            })
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(store.simulation(clone_id).is_none());
        assert!(!store.simulation(simulation.id).unwrap().is_legacy);

        // Valid plan: both writes land together.
        store
            .commit_version(VersionPlan {
                mark_legacy: Some(simulation.id),
                bundle: SimulationBundle {
                    simulation: clone,
                    assets: vec![],
                    events: vec![],
                    insurances: vec![],
                },
            })
            .unwrap();
        assert!(store.simulation(simulation.id).unwrap().is_legacy);
        assert_eq!(store.simulation(clone_id).unwrap().version, 2);

        let bundle = store.load_owned(clone_id, advisor_id).unwrap();
        assert_eq!(bundle.simulation.parent_version_id, Some(simulation.id));
    }

    #[test]
    fn test_list_current_filters_legacy_and_orders_by_recency() {
        let (store, _advisor_id, simulation) = seeded_store();
        let client_id = simulation.client_id;

        let mut older = Simulation::new(
            client_id,
            "Older scenario",
            dec!(0.04),
            date(2024, 1, 1),
            LifeStatus::Alive,
        );
        older.updated_at = simulation.updated_at - Duration::days(2);
        let mut legacy = Simulation::new(
            client_id,
            "Superseded scenario",
            dec!(0.04),
            date(2024, 1, 1),
            LifeStatus::Alive,
        );
        legacy.is_legacy = true;
        for sim in [older.clone(), legacy] {
            store.insert_bundle(SimulationBundle {
                simulation: sim,
                assets: vec![],
                events: vec![],
                insurances: vec![],
            });
        }

        let listed = store.list_current(client_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, simulation.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[test]
    fn test_latest_analysis_wins_by_creation_time() {
        let (store, _advisor_id, simulation) = seeded_store();

        let mut first = AiAnalysis::new(
            simulation.id,
            "Looks healthy",
            vec![],
            vec![],
            serde_json::json!({}),
        );
        first.created_at = Utc::now() - Duration::hours(1);
        let second = AiAnalysis::new(
            simulation.id,
            "Inflation risk detected",
            vec!["inflation".to_string()],
            vec!["raise contributions".to_string()],
            serde_json::json!({}),
        );

        store.append_analysis(first).unwrap();
        store.append_analysis(second).unwrap();

        let latest = store.latest_analysis(simulation.id).unwrap().unwrap();
        assert_eq!(latest.summary, "Inflation risk detected");
        assert!(store
            .latest_analysis(Uuid::new_v4())
            .unwrap()
            .is_none());
    }
}
