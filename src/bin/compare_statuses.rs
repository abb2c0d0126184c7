//! Project one simulation under every life status side by side.
//!
//! Outputs a comparison table and CSV for the advisor-facing comparative
//! chart.

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use wealth_planner::model::{Asset, AssetKind, Event, FlowDirection, Frequency, Insurance};
use wealth_planner::money;
use wealth_planner::projection::summarize;
use wealth_planner::scenario::StatusProjection;
use wealth_planner::{
    Client, InMemoryStore, LifeStatus, ScenarioRunner, Simulation, SimulationBundle,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = Arc::new(InMemoryStore::new());
    let advisor_id = Uuid::new_v4();
    let client = Client::new(advisor_id, "Silva family", date(1975, 3, 14));
    let client_id = client.id;
    store.insert_client(client);

    let simulation = Simulation::new(
        client_id,
        "Family estate plan",
        dec!(0.04),
        date(2024, 1, 1),
        LifeStatus::Alive,
    );
    let simulation_id = simulation.id;
    store.insert_bundle(SimulationBundle {
        simulation,
        assets: vec![
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
        ],
        events: vec![
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
                "Household expenses",
                FlowDirection::Outflow,
                dec!(30000),
                Frequency::Monthly,
                date(2024, 1, 1),
            ),
        ],
        insurances: vec![Insurance::new(
            simulation_id,
            "Term life policy",
            dec!(1200),
            dec!(3000000),
            240,
            date(2023, 12, 1),
        )],
    });

    let runner = ScenarioRunner::new(store);
    let matrix = runner.run_status_matrix(simulation_id, advisor_id)?;

    let alive = status_row(&matrix, LifeStatus::Alive);
    let deceased = status_row(&matrix, LifeStatus::Deceased);
    let disabled = status_row(&matrix, LifeStatus::Disabled);

    println!("Status comparison ({} years):", alive.results.len());
    println!(
        "{:>6} {:>18} {:>18} {:>18}",
        "Year", "Alive", "Deceased", "Disabled"
    );
    println!("{}", "-".repeat(64));
    for (i, row) in alive.results.iter().take(20).enumerate() {
        println!(
            "{:>6} {:>18} {:>18} {:>18}",
            row.year,
            money::fixed2(row.wealth),
            money::fixed2(deceased.results[i].wealth),
            money::fixed2(disabled.results[i].wealth),
        );
    }
    if alive.results.len() > 20 {
        println!("... ({} more years)", alive.results.len() - 20);
    }

    let output_path = "status_comparison.csv";
    let mut file = File::create(output_path).context("unable to create output file")?;
    writeln!(file, "Year,AliveWealth,DeceasedWealth,DisabledWealth")?;
    for (i, row) in alive.results.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{}",
            row.year,
            money::fixed2(row.wealth),
            money::fixed2(deceased.results[i].wealth),
            money::fixed2(disabled.results[i].wealth),
        )?;
    }
    println!("\nOutput written to {}", output_path);

    println!("\nSummary by status:");
    for projection in &matrix {
        let summary = summarize(&projection.results);
        match summary.depletion_year {
            Some(year) => println!(
                "  {:>8}: final wealth {}, exhausted in {}",
                projection.status.as_str(),
                money::fixed2(summary.final_wealth),
                year
            ),
            None => println!(
                "  {:>8}: final wealth {}",
                projection.status.as_str(),
                money::fixed2(summary.final_wealth)
            ),
        }
    }

    Ok(())
}

fn status_row(matrix: &[StatusProjection], status: LifeStatus) -> &StatusProjection {
    matrix
        .iter()
        .find(|p| p.status == status)
        .expect("runner covers every status")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}
