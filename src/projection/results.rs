//! Year-by-year projection output structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// One projected calendar year.
///
/// Monetary fields serialize as fixed two-decimal strings; this is the only
/// place decimals leave the computation domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: i32,

    /// Running patrimony at year end, after growth
    #[serde(with = "money::serde_fixed2")]
    pub wealth: Decimal,

    /// Net of the year's active events
    #[serde(with = "money::serde_fixed2")]
    pub cash_flow: Decimal,

    /// Insured values released this year; omitted when zero
    #[serde(
        with = "money::serde_opt_fixed2",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub insurance_received: Option<Decimal>,
}

/// Aggregates over one trajectory
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySummary {
    pub years: usize,

    #[serde(with = "money::serde_fixed2")]
    pub final_wealth: Decimal,

    #[serde(with = "money::serde_fixed2")]
    pub total_cash_flow: Decimal,

    #[serde(with = "money::serde_fixed2")]
    pub total_insurance: Decimal,

    /// First year the patrimony is exhausted, if any
    pub depletion_year: Option<i32>,
}

/// Summarize a trajectory for display and downstream prompts
pub fn summarize(results: &[YearResult]) -> TrajectorySummary {
    TrajectorySummary {
        years: results.len(),
        final_wealth: results.last().map(|r| r.wealth).unwrap_or(Decimal::ZERO),
        total_cash_flow: results.iter().map(|r| r.cash_flow).sum(),
        total_insurance: results.iter().filter_map(|r| r.insurance_received).sum(),
        depletion_year: results
            .iter()
            .find(|r| r.wealth <= Decimal::ZERO)
            .map(|r| r.year),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_year_result_serializes_fixed2_camel_case() {
        let row = YearResult {
            year: 2024,
            wealth: dec!(1050.5),
            cash_flow: dec!(-500),
            insurance_received: None,
        };
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["year"], 2024);
        assert_eq!(json["wealth"], "1050.50");
        assert_eq!(json["cashFlow"], "-500.00");
        assert!(json.get("insuranceReceived").is_none());
    }

    #[test]
    fn test_insurance_received_present_when_paid() {
        let row = YearResult {
            year: 2024,
            wealth: dec!(3000000),
            cash_flow: dec!(0),
            insurance_received: Some(dec!(3000000)),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["insuranceReceived"], "3000000.00");

        let back: YearResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_summarize() {
        let rows = vec![
            YearResult {
                year: 2024,
                wealth: dec!(100),
                cash_flow: dec!(-900),
                insurance_received: Some(dec!(500)),
            },
            YearResult {
                year: 2025,
                wealth: dec!(-800),
                cash_flow: dec!(-900),
                insurance_received: None,
            },
            YearResult {
                year: 2026,
                wealth: dec!(-1700),
                cash_flow: dec!(-900),
                insurance_received: None,
            },
        ];

        let summary = summarize(&rows);
        assert_eq!(summary.years, 3);
        assert_eq!(summary.final_wealth, dec!(-1700));
        assert_eq!(summary.total_cash_flow, dec!(-2700));
        assert_eq!(summary.total_insurance, dec!(500));
        assert_eq!(summary.depletion_year, Some(2025));
    }

    #[test]
    fn test_summarize_empty_trajectory() {
        let summary = summarize(&[]);
        assert_eq!(summary.years, 0);
        assert_eq!(summary.final_wealth, Decimal::ZERO);
        assert_eq!(summary.depletion_year, None);
    }
}
