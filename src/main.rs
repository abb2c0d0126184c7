//! Wealth Planner CLI
//!
//! Projects a household's wealth trajectory from a sample or CSV-loaded
//! simulation, writes the full trajectory to CSV, and demonstrates scenario
//! versioning.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use wealth_planner::model::{
    loader, Asset, AssetKind, Event, FlowDirection, Frequency, Insurance,
};
use wealth_planner::money;
use wealth_planner::notify::LogNotifier;
use wealth_planner::projection::summarize;
use wealth_planner::{
    Client, InMemoryStore, LifeStatus, ProjectionEngine, Simulation, SimulationBundle,
    SimulationStore, VersioningManager,
};

#[derive(Parser)]
#[command(
    name = "wealth_planner",
    about = "Project a household's wealth trajectory through 2060"
)]
struct Args {
    /// Life status override for this run (ALIVE, DECEASED, DISABLED)
    #[arg(long)]
    status: Option<String>,

    /// Annual real rate as a decimal fraction (e.g. 0.04)
    #[arg(long, default_value = "0.04")]
    rate: String,

    /// Projection start date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    start: String,

    /// Asset valuations CSV; uses the built-in sample household when absent
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Cash-flow events CSV
    #[arg(long)]
    events: Option<PathBuf>,

    /// Insurance policies CSV
    #[arg(long)]
    insurances: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Wealth Planner v0.1.0");
    println!("=====================\n");

    let status_override = args
        .status
        .as_deref()
        .map(LifeStatus::from_str)
        .transpose()?;
    let base_tax = Decimal::from_str(&args.rate).context("invalid --rate")?;
    let start_date =
        NaiveDate::parse_from_str(&args.start, "%Y-%m-%d").context("invalid --start")?;

    // Seed the in-memory store with one advisor, one client, and one
    // simulation.
    let store = Arc::new(InMemoryStore::new());
    let advisor_id = Uuid::new_v4();
    let client = Client::new(advisor_id, "Silva family", date(1975, 3, 14));
    let client_id = client.id;
    store.insert_client(client);

    let simulation = Simulation::new(
        client_id,
        "Family estate plan",
        base_tax,
        start_date,
        LifeStatus::Alive,
    );
    let simulation_id = simulation.id;

    let assets = match &args.assets {
        Some(path) => loader::load_assets(path, simulation_id)?,
        None => sample_assets(simulation_id),
    };
    let events = match &args.events {
        Some(path) => loader::load_events(path, simulation_id)?,
        None => sample_events(simulation_id),
    };
    let insurances = match &args.insurances {
        Some(path) => loader::load_insurances(path, simulation_id)?,
        None => sample_insurances(simulation_id),
    };

    println!("Simulation: {}", simulation.name);
    println!("  Start: {}", simulation.start_date);
    println!("  Rate: {}% a.a.", base_tax * dec!(100));
    println!("  Assets: {}", assets.len());
    println!("  Events: {}", events.len());
    println!("  Insurances: {}", insurances.len());
    if let Some(status) = status_override {
        println!("  Status override: {}", status.as_str());
    }
    println!();

    store.insert_bundle(SimulationBundle {
        simulation,
        assets,
        events,
        insurances,
    });

    // Run the projection; the log notifier stands in for the queue producer
    // that feeds the sensitivity-analysis pipeline.
    let engine = ProjectionEngine::new(store.clone(), Arc::new(LogNotifier));
    let results = engine.generate(simulation_id, advisor_id, status_override)?;

    // Print the first years to the console
    println!("Projection Results ({} years):", results.len());
    println!(
        "{:>6} {:>16} {:>16} {:>18}",
        "Year", "CashFlow", "Insurance", "Wealth"
    );
    println!("{}", "-".repeat(60));
    for row in results.iter().take(15) {
        println!(
            "{:>6} {:>16} {:>16} {:>18}",
            row.year,
            money::fixed2(row.cash_flow),
            row.insurance_received
                .map(money::fixed2)
                .unwrap_or_default(),
            money::fixed2(row.wealth),
        );
    }
    if results.len() > 15 {
        println!("... ({} more years)", results.len() - 15);
    }

    // Write the full trajectory to CSV
    let mut file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output.display()))?;
    writeln!(file, "Year,CashFlow,InsuranceReceived,Wealth")?;
    for row in &results {
        writeln!(
            file,
            "{},{},{},{}",
            row.year,
            money::fixed2(row.cash_flow),
            row.insurance_received
                .map(money::fixed2)
                .unwrap_or_default(),
            money::fixed2(row.wealth),
        )?;
    }
    println!("\nFull results written to: {}", args.output.display());

    // Print summary
    let summary = summarize(&results);
    println!("\nSummary:");
    println!("  Years: {}", summary.years);
    println!("  Final Wealth: {}", money::fixed2(summary.final_wealth));
    println!(
        "  Total Net Cash Flow: {}",
        money::fixed2(summary.total_cash_flow)
    );
    match summary.depletion_year {
        Some(year) => println!("  Patrimony exhausted in: {}", year),
        None => println!("  Patrimony lasts through the horizon"),
    }

    // Demonstrate versioning: an unnamed re-version supersedes the original,
    // a snapshot leaves it untouched.
    let manager = VersioningManager::new(store.clone());
    let revision = manager.create_version(simulation_id, advisor_id, None, false)?;
    println!("\nVersioning:");
    println!(
        "  Created version {} (parent {})",
        revision.simulation.version, simulation_id
    );
    println!(
        "  Original marked legacy: {}",
        store
            .simulation(simulation_id)
            .map(|s| s.is_legacy)
            .unwrap_or(false)
    );

    let snapshot =
        manager.create_version(revision.simulation.id, advisor_id, Some("Current Situation"), true)?;
    println!(
        "  Snapshot '{}' at version {} dated {}",
        snapshot.simulation.name, snapshot.simulation.version, snapshot.simulation.start_date
    );

    let active = store.list_current(client_id)?;
    println!("  Active scenarios for client: {}", active.len());

    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

fn sample_assets(simulation_id: Uuid) -> Vec<Asset> {
    vec![
        Asset::new(
            simulation_id,
            "Checking account",
            AssetKind::Financial,
            dec!(500000),
            date(2023, 12, 31),
        ),
        Asset::new(
            simulation_id,
            "Stock portfolio",
            AssetKind::Financial,
            dec!(2500000),
            date(2023, 12, 31),
        ),
        Asset::new(
            simulation_id,
            "Beach apartment",
            AssetKind::Fixed,
            dec!(2000000),
            date(2020, 1, 1),
        ),
    ]
}

fn sample_events(simulation_id: Uuid) -> Vec<Event> {
    vec![
        Event::new(
            simulation_id,
            "Partner salary",
            FlowDirection::Inflow,
            dec!(45000),
            Frequency::Monthly,
            date(2024, 1, 1),
        ),
        Event::new(
            simulation_id,
            "Warehouse upkeep",
            FlowDirection::Outflow,
            dec!(15000),
            Frequency::Monthly,
            date(2024, 1, 1),
        ),
        Event::new(
            simulation_id,
            "Annual family trip",
            FlowDirection::Outflow,
            dec!(80000),
            Frequency::Yearly,
            date(2024, 6, 1),
        ),
    ]
}

fn sample_insurances(simulation_id: Uuid) -> Vec<Insurance> {
    vec![Insurance::new(
        simulation_id,
        "Term life policy",
        dec!(1200),
        dec!(3000000),
        240,
        date(2023, 12, 1),
    )]
}
