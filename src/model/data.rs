//! Household planning data structures

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::money;

/// Life status resolved for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeStatus {
    Alive,
    Deceased,
    Disabled,
}

impl LifeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStatus::Alive => "ALIVE",
            LifeStatus::Deceased => "DECEASED",
            LifeStatus::Disabled => "DISABLED",
        }
    }
}

impl std::str::FromStr for LifeStatus {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "ALIVE" => Ok(LifeStatus::Alive),
            "DECEASED" => Ok(LifeStatus::Deceased),
            "DISABLED" => Ok(LifeStatus::Disabled),
            other => Err(Error::Validation(format!("unknown life status: {}", other))),
        }
    }
}

/// Asset classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    /// Bank accounts, brokerage portfolios, funds
    Financial,
    /// Real estate and other illiquid holdings
    Fixed,
}

/// Direction of a cash-flow event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

/// Recurrence of a cash-flow event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Once,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Multiplier turning an event value into its yearly impact
    pub fn annual_multiplier(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Once | Frequency::Yearly => 1,
        }
    }
}

/// A family/household managed by exactly one advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub advisor_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(advisor_id: Uuid, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            advisor_id,
            name: name.into(),
            email: None,
            phone: None,
            birth_date,
            created_at: Utc::now(),
        }
    }
}

/// One versioned projection scenario belonging to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,

    /// Annual real interest rate as a decimal fraction (0.04 = 4%)
    pub base_tax: Decimal,

    /// First projected year is the year of this date
    pub start_date: NaiveDate,

    pub status: LifeStatus,

    /// Version number within the lineage, >= 1
    pub version: u32,

    /// Superseded scenarios are kept for audit but excluded from default
    /// listings
    pub is_legacy: bool,

    /// Lineage pointer to the simulation this one was cloned from
    pub parent_version_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Simulation {
    pub fn new(
        client_id: Uuid,
        name: impl Into<String>,
        base_tax: Decimal,
        start_date: NaiveDate,
        status: LifeStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            name: name.into(),
            base_tax,
            start_date,
            status,
            version: 1,
            is_legacy: false,
            parent_version_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }
}

/// Financing terms on a fixed asset acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financing {
    pub installments: u32,
    pub interest_rate: Decimal,
    pub down_payment: Decimal,
}

/// A point-in-time valuation record.
///
/// Several records may share a name across different dates; they form the
/// valuation history of one holding, and only the latest record at or before
/// a reference date counts toward initial wealth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub name: String,
    pub kind: AssetKind,
    pub value: Decimal,

    /// Valuation/acquisition reference date
    pub date: NaiveDate,

    /// Present only for financed FIXED assets
    pub financing: Option<Financing>,
}

impl Asset {
    pub fn new(
        simulation_id: Uuid,
        name: impl Into<String>,
        kind: AssetKind,
        value: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            name: name.into(),
            kind,
            value,
            date,
            financing: None,
        }
    }

    /// Monthly installment on a financed acquisition:
    /// `(value - down_payment) / installments`.
    ///
    /// Returns `Ok(None)` for assets without financing terms and an
    /// arithmetic error for a zero installment count.
    pub fn monthly_installment(&self) -> Result<Option<Decimal>> {
        let Some(financing) = &self.financing else {
            return Ok(None);
        };
        let principal = self.value - financing.down_payment;
        money::checked_div(principal, Decimal::from(financing.installments)).map(Some)
    }

    /// Copy of this record owned by another simulation, with a fresh identity
    pub fn clone_for(&self, simulation_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            ..self.clone()
        }
    }
}

/// A recurring or one-time cash flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub name: String,
    pub direction: FlowDirection,
    pub value: Decimal,
    pub frequency: Frequency,
    pub start_date: NaiveDate,

    /// Absent = indefinite/lifetime
    pub end_date: Option<NaiveDate>,
}

impl Event {
    pub fn new(
        simulation_id: Uuid,
        name: impl Into<String>,
        direction: FlowDirection,
        value: Decimal,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            name: name.into(),
            direction,
            value,
            frequency,
            start_date,
            end_date: None,
        }
    }

    /// Half-open activation test for a calendar year: the event has started
    /// before the year ends, and has not ended before the year begins.
    pub fn is_active_in(&self, year: i32) -> bool {
        self.start_date < year_end(year)
            && self.end_date.map_or(true, |end| end > year_start(year))
    }

    pub fn clone_for(&self, simulation_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            ..self.clone()
        }
    }
}

/// A protection policy paying out on a death inside its coverage window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub name: String,
    pub premium: Decimal,
    pub insured_value: Decimal,

    /// Coverage duration in months
    pub duration: u32,

    pub start_date: NaiveDate,
}

impl Insurance {
    pub fn new(
        simulation_id: Uuid,
        name: impl Into<String>,
        premium: Decimal,
        insured_value: Decimal,
        duration: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            name: name.into(),
            premium,
            insured_value,
            duration,
            start_date,
        }
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.start_date + Months::new(self.duration)
    }

    /// Payable for a death on `reference`: coverage must have started
    /// strictly before the date and expire strictly after it. A policy
    /// starting exactly on `reference` is not payable.
    pub fn covers_death_on(&self, reference: NaiveDate) -> bool {
        self.start_date < reference && self.expiration_date() > reference
    }

    pub fn clone_for(&self, simulation_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            ..self.clone()
        }
    }
}

/// Persisted result of one sensitivity-analysis run. Append-only; the latest
/// record by creation time is the canonical read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub summary: String,
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
    pub raw_response: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AiAnalysis {
    pub fn new(
        simulation_id: Uuid,
        summary: impl Into<String>,
        risks: Vec<String>,
        suggestions: Vec<String>,
        raw_response: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            simulation_id,
            summary: summary.into(),
            risks,
            suggestions,
            raw_response,
            created_at: Utc::now(),
        }
    }
}

/// First day of a calendar year
fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar year")
}

/// First day of the following year (exclusive upper bound)
fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid calendar year")
}
