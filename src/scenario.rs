//! Batch projection runner for side-by-side scenario comparisons.
//!
//! Loads a bundle once, then projects it under several resolved statuses, or
//! projects several sibling simulations. Independent runs are spread across
//! threads; the year loop inside each run stays strictly sequential.
//! Comparison runs do not publish notifications; only
//! `ProjectionEngine::generate` feeds the analysis pipeline.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::model::LifeStatus;
use crate::projection::{project, YearResult};
use crate::store::SimulationStore;

/// One simulation projected under one resolved status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusProjection {
    pub status: LifeStatus,
    pub results: Vec<YearResult>,
}

/// One simulation projected under its stored status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationProjection {
    pub simulation_id: Uuid,
    pub name: String,
    pub version: u32,
    pub results: Vec<YearResult>,
}

/// Pre-wired runner for batch projections
pub struct ScenarioRunner {
    store: Arc<dyn SimulationStore>,
}

impl ScenarioRunner {
    pub fn new(store: Arc<dyn SimulationStore>) -> Self {
        Self { store }
    }

    /// Project one simulation under every life status
    pub fn run_status_matrix(
        &self,
        simulation_id: Uuid,
        advisor_id: Uuid,
    ) -> Result<Vec<StatusProjection>> {
        let bundle = self.store.load_owned(simulation_id, advisor_id)?;
        let statuses = [
            LifeStatus::Alive,
            LifeStatus::Deceased,
            LifeStatus::Disabled,
        ];

        Ok(statuses
            .par_iter()
            .map(|&status| StatusProjection {
                status,
                results: project(&bundle, status),
            })
            .collect())
    }

    /// Project several simulations owned by the same advisor, e.g. the
    /// versions of one lineage for a comparative chart
    pub fn run_batch(
        &self,
        simulation_ids: &[Uuid],
        advisor_id: Uuid,
    ) -> Result<Vec<SimulationProjection>> {
        let bundles = simulation_ids
            .iter()
            .map(|&id| self.store.load_owned(id, advisor_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(bundles
            .par_iter()
            .map(|bundle| SimulationProjection {
                simulation_id: bundle.simulation.id,
                name: bundle.simulation.name.clone(),
                version: bundle.simulation.version,
                results: project(bundle, bundle.simulation.status),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::Error;
    use crate::model::{Asset, AssetKind, Client, Event, FlowDirection, Frequency, Simulation};
    use crate::store::{InMemoryStore, SimulationBundle};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> (Arc<InMemoryStore>, Uuid, Uuid) {
        let store = Arc::new(InMemoryStore::new());
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
        let sim_id = simulation.id;
        store.insert_bundle(SimulationBundle {
            simulation,
            assets: vec![Asset::new(
                sim_id,
                "Checking",
                AssetKind::Financial,
                dec!(500000),
                date(2023, 12, 31),
            )],
            events: vec![Event::new(
                sim_id,
                "Salary",
                FlowDirection::Inflow,
                dec!(45000),
                Frequency::Monthly,
                date(2024, 1, 1),
            )],
            insurances: vec![],
        });

        (store, advisor_id, sim_id)
    }

    #[test]
    fn test_status_matrix_matches_single_runs() {
        let (store, advisor_id, sim_id) = seeded();
        let runner = ScenarioRunner::new(store.clone());

        let matrix = runner.run_status_matrix(sim_id, advisor_id).unwrap();
        assert_eq!(matrix.len(), 3);

        let bundle = store.load_owned(sim_id, advisor_id).unwrap();
        for row in &matrix {
            assert_eq!(row.results, project(&bundle, row.status));
        }

        let alive = matrix.iter().find(|r| r.status == LifeStatus::Alive).unwrap();
        let deceased = matrix
            .iter()
            .find(|r| r.status == LifeStatus::Deceased)
            .unwrap();
        assert_ne!(alive.results[0].cash_flow, deceased.results[0].cash_flow);
    }

    #[test]
    fn test_batch_rejects_foreign_simulations() {
        let (store, advisor_id, sim_id) = seeded();
        let runner = ScenarioRunner::new(store);

        let err = runner
            .run_batch(&[sim_id, Uuid::new_v4()], advisor_id)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let rows = runner.run_batch(&[sim_id], advisor_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Estate plan");
    }
}
