//! Wealth Planner - projection and versioning engine for multi-family-office planning
//!
//! This library provides:
//! - Year-by-year patrimony projections to a fixed horizon
//! - Status-dependent cash-flow and insurance payout rules
//! - Simulation versioning: supersession, named branches, and snapshots
//! - Batch comparisons across life statuses and scenario versions
//! - A storage trait and event sink keeping persistence and the analysis
//!   pipeline behind interfaces

pub mod error;
pub mod model;
pub mod money;
pub mod notify;
pub mod projection;
pub mod rules;
pub mod scenario;
pub mod store;
pub mod versioning;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Asset, Client, Event, Insurance, LifeStatus, Simulation};
pub use notify::{ProjectionGenerated, ProjectionNotifier};
pub use projection::{ProjectionEngine, YearResult, HORIZON_YEAR};
pub use scenario::ScenarioRunner;
pub use store::{InMemoryStore, SimulationBundle, SimulationStore};
pub use versioning::VersioningManager;
