//! Household planning data structures and CSV ingestion

mod data;
pub mod loader;

pub use data::{
    AiAnalysis, Asset, AssetKind, Client, Event, Financing, FlowDirection, Frequency, Insurance,
    LifeStatus, Simulation,
};
pub use loader::{load_assets, load_events, load_insurances};
