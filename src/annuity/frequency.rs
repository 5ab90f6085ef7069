use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// Payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentFrequency {
    /// Payments per year
    pub fn factor(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaymentFrequency::Annual => "Annual",
            PaymentFrequency::SemiAnnual => "Semi-annual",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::Monthly => "Monthly",
        }
    }

    pub fn from_factor(factor: u32) -> Option<Self> {
        match factor {
            1 => Some(PaymentFrequency::Annual),
            2 => Some(PaymentFrequency::SemiAnnual),
            4 => Some(PaymentFrequency::Quarterly),
            12 => Some(PaymentFrequency::Monthly),
            _ => None,
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "annually" | "yearly" => Ok(PaymentFrequency::Annual),
            "semi-annual" | "semiannual" | "semi-annually" => Ok(PaymentFrequency::SemiAnnual),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            other => Err(CalcError::validation(
                "frequency",
                format!("frequency must be Annual, Semi-annual, Quarterly or Monthly, got '{other}'"),
            )),
        }
    }
}

/// Payments per year from either a count ("12") or a name ("Monthly")
pub fn parse_freq_factor(s: &str) -> crate::error::Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(n) => Ok(n),
        Err(_) => Ok(s.parse::<PaymentFrequency>()?.factor()),
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        for name in ["Annual", "Semi-annual", "Quarterly", "Monthly"] {
            let freq: PaymentFrequency = name.parse().unwrap();
            assert_eq!(freq.name(), name);
            assert_eq!(PaymentFrequency::from_factor(freq.factor()), Some(freq));
        }
        assert_eq!("monthly".parse::<PaymentFrequency>().unwrap().factor(), 12);
        assert_eq!(PaymentFrequency::from_factor(3), None);
    }

    #[test]
    fn test_unknown_frequency() {
        let err = "fortnightly".parse::<PaymentFrequency>().unwrap_err();
        assert_eq!(err.field(), Some("frequency"));
    }

    #[test]
    fn test_parse_freq_factor() {
        assert_eq!(parse_freq_factor(" 4 ").unwrap(), 4);
        assert_eq!(parse_freq_factor("Semi-annual").unwrap(), 2);
        assert!(parse_freq_factor("-1").is_err());
    }
}
