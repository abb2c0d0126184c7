//! Status-dependent projection rules.
//!
//! Each life status resolves to one fixed rule row, so the cash-flow and
//! payout treatment of a status lives in a single exhaustive match instead
//! of conditionals scattered through the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::LifeStatus;

/// Multipliers and payout eligibility applied during one projection run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusRules {
    /// Factor applied to INFLOW event values
    pub inflow_factor: Decimal,

    /// Factor applied to OUTFLOW event values
    pub outflow_factor: Decimal,

    /// Whether insured values are released at the start of the projection
    /// window
    pub death_payout: bool,
}

impl StatusRules {
    /// Resolve the rule row for a life status.
    ///
    /// DISABLED carries the same cash-flow treatment as ALIVE; disability
    /// riders are quoted per policy and stay outside the projection, so only
    /// a death releases insured values.
    pub fn for_status(status: LifeStatus) -> Self {
        match status {
            LifeStatus::Alive | LifeStatus::Disabled => Self {
                inflow_factor: Decimal::ONE,
                outflow_factor: Decimal::ONE,
                death_payout: false,
            },
            // A deceased holder draws no income and roughly halves the
            // household's cost of living.
            LifeStatus::Deceased => Self {
                inflow_factor: Decimal::ZERO,
                outflow_factor: dec!(0.5),
                death_payout: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alive_rules_are_neutral() {
        let rules = StatusRules::for_status(LifeStatus::Alive);
        assert_eq!(rules.inflow_factor, Decimal::ONE);
        assert_eq!(rules.outflow_factor, Decimal::ONE);
        assert!(!rules.death_payout);
    }

    #[test]
    fn test_deceased_rules() {
        let rules = StatusRules::for_status(LifeStatus::Deceased);
        assert_eq!(rules.inflow_factor, Decimal::ZERO);
        assert_eq!(rules.outflow_factor, dec!(0.5));
        assert!(rules.death_payout);
    }

    #[test]
    fn test_disabled_matches_alive() {
        assert_eq!(
            StatusRules::for_status(LifeStatus::Disabled),
            StatusRules::for_status(LifeStatus::Alive)
        );
    }
}
