//! Load simulation child records from CSV files.
//!
//! Row structs mirror the advisor-facing export columns; every field is
//! parsed explicitly so a malformed row fails the whole load instead of
//! being skipped.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Asset, AssetKind, Event, Financing, FlowDirection, Frequency, Insurance};
use crate::error::{Error, Result};

/// Raw CSV row for an asset valuation record
#[derive(Debug, serde::Deserialize)]
struct AssetRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Installments", default)]
    installments: Option<u32>,
    #[serde(rename = "InterestRate", default)]
    interest_rate: Option<String>,
    #[serde(rename = "DownPayment", default)]
    down_payment: Option<String>,
}

impl AssetRow {
    fn into_asset(self, simulation_id: Uuid) -> Result<Asset> {
        let kind = match self.kind.as_str() {
            "FINANCIAL" => AssetKind::Financial,
            "FIXED" => AssetKind::Fixed,
            other => return Err(Error::Validation(format!("unknown asset kind: {}", other))),
        };

        let financing = match self.installments {
            Some(installments) => {
                if kind != AssetKind::Fixed {
                    return Err(Error::Validation(format!(
                        "financing terms on non-FIXED asset '{}'",
                        self.name
                    )));
                }
                Some(Financing {
                    installments,
                    interest_rate: parse_optional_amount(self.interest_rate, "InterestRate")?,
                    down_payment: parse_optional_amount(self.down_payment, "DownPayment")?,
                })
            }
            None => None,
        };

        Ok(Asset {
            id: Uuid::new_v4(),
            simulation_id,
            name: self.name,
            kind,
            value: parse_amount(&self.value, "Value")?,
            date: parse_date(&self.date, "Date")?,
            financing,
        })
    }
}

/// Raw CSV row for a cash-flow event
#[derive(Debug, serde::Deserialize)]
struct EventRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Direction")]
    direction: String,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "EndDate", default)]
    end_date: Option<String>,
}

impl EventRow {
    fn into_event(self, simulation_id: Uuid) -> Result<Event> {
        let direction = match self.direction.as_str() {
            "INFLOW" => FlowDirection::Inflow,
            "OUTFLOW" => FlowDirection::Outflow,
            other => return Err(Error::Validation(format!("unknown direction: {}", other))),
        };

        let frequency = match self.frequency.as_str() {
            "ONCE" => Frequency::Once,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            other => return Err(Error::Validation(format!("unknown frequency: {}", other))),
        };

        Ok(Event {
            id: Uuid::new_v4(),
            simulation_id,
            name: self.name,
            direction,
            value: parse_amount(&self.value, "Value")?,
            frequency,
            start_date: parse_date(&self.start_date, "StartDate")?,
            end_date: self
                .end_date
                .map(|raw| parse_date(&raw, "EndDate"))
                .transpose()?,
        })
    }
}

/// Raw CSV row for an insurance policy
#[derive(Debug, serde::Deserialize)]
struct InsuranceRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Premium")]
    premium: String,
    #[serde(rename = "InsuredValue")]
    insured_value: String,
    #[serde(rename = "DurationMonths")]
    duration: u32,
    #[serde(rename = "StartDate")]
    start_date: String,
}

impl InsuranceRow {
    fn into_insurance(self, simulation_id: Uuid) -> Result<Insurance> {
        Ok(Insurance {
            id: Uuid::new_v4(),
            simulation_id,
            name: self.name,
            premium: parse_amount(&self.premium, "Premium")?,
            insured_value: parse_amount(&self.insured_value, "InsuredValue")?,
            duration: self.duration,
            start_date: parse_date(&self.start_date, "StartDate")?,
        })
    }
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::Validation(format!("{} '{}': {}", field, raw, e)))
}

fn parse_amount(raw: &str, field: &str) -> Result<Decimal> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|e| Error::Validation(format!("{} '{}': {}", field, raw, e)))?;
    if value < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "{} must be non-negative, got {}",
            field, raw
        )));
    }
    Ok(value)
}

fn parse_optional_amount(raw: Option<String>, field: &str) -> Result<Decimal> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_amount(&s, field),
        _ => Ok(Decimal::ZERO),
    }
}

/// Load asset valuation records for a simulation from a CSV file
pub fn load_assets<P: AsRef<Path>>(path: P, simulation_id: Uuid) -> Result<Vec<Asset>> {
    let reader = Reader::from_path(path).map_err(|e| Error::Validation(e.to_string()))?;
    collect_assets(reader, simulation_id)
}

/// Load assets from any reader (e.g., string buffer, network stream)
pub fn load_assets_from_reader<R: Read>(reader: R, simulation_id: Uuid) -> Result<Vec<Asset>> {
    collect_assets(Reader::from_reader(reader), simulation_id)
}

fn collect_assets<R: Read>(mut reader: Reader<R>, simulation_id: Uuid) -> Result<Vec<Asset>> {
    let mut assets = Vec::new();
    for row in reader.deserialize() {
        let row: AssetRow = row.map_err(|e| Error::Validation(e.to_string()))?;
        assets.push(row.into_asset(simulation_id)?);
    }
    Ok(assets)
}

/// Load cash-flow events for a simulation from a CSV file
pub fn load_events<P: AsRef<Path>>(path: P, simulation_id: Uuid) -> Result<Vec<Event>> {
    let reader = Reader::from_path(path).map_err(|e| Error::Validation(e.to_string()))?;
    collect_events(reader, simulation_id)
}

/// Load events from any reader
pub fn load_events_from_reader<R: Read>(reader: R, simulation_id: Uuid) -> Result<Vec<Event>> {
    collect_events(Reader::from_reader(reader), simulation_id)
}

fn collect_events<R: Read>(mut reader: Reader<R>, simulation_id: Uuid) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for row in reader.deserialize() {
        let row: EventRow = row.map_err(|e| Error::Validation(e.to_string()))?;
        events.push(row.into_event(simulation_id)?);
    }
    Ok(events)
}

/// Load insurance policies for a simulation from a CSV file
pub fn load_insurances<P: AsRef<Path>>(path: P, simulation_id: Uuid) -> Result<Vec<Insurance>> {
    let reader = Reader::from_path(path).map_err(|e| Error::Validation(e.to_string()))?;
    collect_insurances(reader, simulation_id)
}

/// Load insurances from any reader
pub fn load_insurances_from_reader<R: Read>(
    reader: R,
    simulation_id: Uuid,
) -> Result<Vec<Insurance>> {
    collect_insurances(Reader::from_reader(reader), simulation_id)
}

fn collect_insurances<R: Read>(
    mut reader: Reader<R>,
    simulation_id: Uuid,
) -> Result<Vec<Insurance>> {
    let mut insurances = Vec::new();
    for row in reader.deserialize() {
        let row: InsuranceRow = row.map_err(|e| Error::Validation(e.to_string()))?;
        insurances.push(row.into_insurance(simulation_id)?);
    }
    Ok(insurances)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_load_assets_with_financing() {
        let csv = "\
Name,Kind,Value,Date,Installments,InterestRate,DownPayment
Checking account,FINANCIAL,500000,2023-12-31,,,
Beach condo,FIXED,2000000,2020-01-01,240,0.009,800000
";
        let simulation_id = Uuid::new_v4();
        let assets = load_assets_from_reader(csv.as_bytes(), simulation_id).unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].kind, AssetKind::Financial);
        assert_eq!(assets[0].value, dec!(500000));
        assert!(assets[0].financing.is_none());

        let condo = &assets[1];
        assert_eq!(condo.simulation_id, simulation_id);
        let financing = condo.financing.as_ref().unwrap();
        assert_eq!(financing.installments, 240);
        assert_eq!(financing.down_payment, dec!(800000));
    }

    #[test]
    fn test_load_events() {
        let csv = "\
Name,Direction,Value,Frequency,StartDate,EndDate
Salary,INFLOW,45000,MONTHLY,2024-01-01,
Family trip,OUTFLOW,80000,YEARLY,2024-06-01,2030-06-01
";
        let events = load_events_from_reader(csv.as_bytes(), Uuid::new_v4()).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].direction, FlowDirection::Inflow);
        assert_eq!(events[0].frequency, Frequency::Monthly);
        assert!(events[0].end_date.is_none());
        assert_eq!(
            events[1].end_date,
            Some(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_load_insurances() {
        let csv = "\
Name,Premium,InsuredValue,DurationMonths,StartDate
Term life,1200,3000000,240,2024-01-01
";
        let insurances = load_insurances_from_reader(csv.as_bytes(), Uuid::new_v4()).unwrap();

        assert_eq!(insurances.len(), 1);
        assert_eq!(insurances[0].insured_value, dec!(3000000));
        assert_eq!(insurances[0].duration, 240);
    }

    #[test]
    fn test_malformed_row_fails_whole_load() {
        let csv = "\
Name,Direction,Value,Frequency,StartDate,EndDate
Salary,INFLOW,45000,MONTHLY,2024-01-01,
Rent,SIDEWAYS,3000,MONTHLY,2024-01-01,
";
        let err = load_events_from_reader(csv.as_bytes(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = "\
Name,Kind,Value,Date
Checking account,FINANCIAL,-10,2023-12-31
";
        let err = load_assets_from_reader(csv.as_bytes(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let csv = "\
Name,Premium,InsuredValue,DurationMonths,StartDate
Term life,1200,3000000,240,01/01/2024
";
        let err = load_insurances_from_reader(csv.as_bytes(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
