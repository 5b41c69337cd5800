use std::fs;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::frequency::PaymentFrequency;

/// Environment variable naming the settings file used by the CLI.
pub const CONFIG_ENV_VAR: &str = "MOTO_FINANCING_CONFIG";

/// Dealership-wide financing limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancingSettings {
    /// Upper bound on the number of installments offered.
    pub max_installments: u32,
    /// Upper bound on the annual interest rate, as a percentage.
    pub max_annual_interest_rate_percent: Decimal,
    /// Frequency used when a request does not name one.
    pub default_frequency: PaymentFrequency,
    /// Reject degenerate loan terms instead of returning an empty schedule.
    pub strict_validation: bool,
}

impl Default for FinancingSettings {
    fn default() -> Self {
        Self {
            max_installments: 120,
            max_annual_interest_rate_percent: dec!(300),
            default_frequency: PaymentFrequency::Monthly,
            strict_validation: false,
        }
    }
}

impl FinancingSettings {
    pub fn from_json_str(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents).context("Failed to parse financing settings")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid settings file '{}'", path.display()))
    }

    /// Loads from `path` if given, otherwise from the file named by
    /// `MOTO_FINANCING_CONFIG`, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = FinancingSettings::from_json_str(r#"{"maxInstallments": 48}"#).unwrap();
        assert_eq!(settings.max_installments, 48);
        assert_eq!(settings.max_annual_interest_rate_percent, dec!(300));
        assert_eq!(settings.default_frequency, PaymentFrequency::Monthly);
        assert!(!settings.strict_validation);
    }

    #[test]
    fn test_full_settings() {
        let settings = FinancingSettings::from_json_str(
            r#"{
                "maxInstallments": 24,
                "maxAnnualInterestRatePercent": "95.5",
                "defaultFrequency": "BIWEEKLY",
                "strictValidation": true
            }"#,
        )
        .unwrap();
        assert_eq!(
            settings,
            FinancingSettings {
                max_installments: 24,
                max_annual_interest_rate_percent: dec!(95.5),
                default_frequency: PaymentFrequency::Biweekly,
                strict_validation: true,
            }
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(FinancingSettings::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FinancingSettings::from_path("/nonexistent/moto-financing.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
