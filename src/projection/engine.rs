//! Core projection engine for yearly wealth trajectories

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::results::YearResult;
use crate::error::Result;
use crate::model::{Asset, Event, FlowDirection, Insurance, LifeStatus};
use crate::money;
use crate::notify::{ProjectionGenerated, ProjectionMetadata, ProjectionNotifier};
use crate::rules::StatusRules;
use crate::store::{SimulationBundle, SimulationStore};

/// Fixed terminal year for every projection
pub const HORIZON_YEAR: i32 = 2060;

/// Main projection engine
pub struct ProjectionEngine {
    store: Arc<dyn SimulationStore>,
    notifier: Arc<dyn ProjectionNotifier>,
}

impl ProjectionEngine {
    /// Create an engine over a storage backend and an event sink
    pub fn new(store: Arc<dyn SimulationStore>, notifier: Arc<dyn ProjectionNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Project a simulation owned by `advisor_id` from its start year through
    /// the horizon.
    ///
    /// `status_override` supersedes the stored life status for this run only;
    /// nothing is written back. After a successful run the trajectory is
    /// published to the notifier, which feeds the asynchronous
    /// sensitivity-analysis pipeline. Publication is fire-and-forget.
    pub fn generate(
        &self,
        simulation_id: Uuid,
        advisor_id: Uuid,
        status_override: Option<LifeStatus>,
    ) -> Result<Vec<YearResult>> {
        let bundle = self.store.load_owned(simulation_id, advisor_id)?;
        let status = status_override.unwrap_or(bundle.simulation.status);

        let results = project(&bundle, status);
        debug!(
            "projected {} years for simulation {} as {}",
            results.len(),
            simulation_id,
            status.as_str()
        );

        self.notifier.publish(ProjectionGenerated {
            simulation_id,
            advisor_id,
            results: results.clone(),
            metadata: ProjectionMetadata {
                name: bundle.simulation.name.clone(),
                base_tax: money::to_f64(bundle.simulation.base_tax),
                status,
            },
        });

        Ok(results)
    }
}

/// Compute the wealth trajectory for a loaded bundle under a resolved status.
///
/// Years are processed strictly in ascending order because each year's wealth
/// carries into the next; this loop must not be parallelized. A start year
/// past the horizon yields an empty trajectory.
pub fn project(bundle: &SimulationBundle, status: LifeStatus) -> Vec<YearResult> {
    let simulation = &bundle.simulation;
    let rules = StatusRules::for_status(status);
    let start_year = simulation.start_year();
    let growth = Decimal::ONE + simulation.base_tax;

    let mut wealth = initial_wealth(&bundle.assets, simulation.start_date);
    let mut results = Vec::new();

    for year in start_year..=HORIZON_YEAR {
        let cash_flow = yearly_cash_flow(&bundle.events, year, &rules);

        // The payout models a single death at the start of the window; it is
        // never re-triggered in later years.
        let payout = if rules.death_payout && year == start_year {
            death_payout(&bundle.insurances, simulation.start_date)
        } else {
            Decimal::ZERO
        };

        // Growth applies after the year's net flows and payout are folded in.
        wealth = (wealth + cash_flow + payout) * growth;

        results.push(YearResult {
            year,
            wealth,
            cash_flow,
            insurance_received: (!payout.is_zero()).then_some(payout),
        });
    }

    results
}

/// Initial wealth: for each asset name, the latest valuation at or before the
/// start date. Records dated after it are pending valuations and ignored.
fn initial_wealth(assets: &[Asset], start_date: NaiveDate) -> Decimal {
    let mut latest: HashMap<&str, &Asset> = HashMap::new();
    for asset in assets {
        if asset.date > start_date {
            continue;
        }
        match latest.get(asset.name.as_str()) {
            // Strictly-after replacement: equal dates keep the first record.
            Some(existing) if asset.date <= existing.date => {}
            _ => {
                latest.insert(asset.name.as_str(), asset);
            }
        }
    }
    latest.values().map(|asset| asset.value).sum()
}

/// Net signed cash flow of the events active in a year, with status factors
/// and frequency annualization applied
fn yearly_cash_flow(events: &[Event], year: i32, rules: &StatusRules) -> Decimal {
    let mut total = Decimal::ZERO;
    for event in events {
        if !event.is_active_in(year) {
            continue;
        }
        let yearly = event.value * Decimal::from(event.frequency.annual_multiplier());
        match event.direction {
            FlowDirection::Inflow => total += yearly * rules.inflow_factor,
            FlowDirection::Outflow => total -= yearly * rules.outflow_factor,
        }
    }
    total
}

/// Insured values payable for a death on the projection start date
fn death_payout(insurances: &[Insurance], reference: NaiveDate) -> Decimal {
    insurances
        .iter()
        .filter(|policy| policy.covers_death_on(reference))
        .map(|policy| policy.insured_value)
        .sum()
}
