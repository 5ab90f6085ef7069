//! Parametric mortality laws
//!
//! Every table in the catalogue is a Gompertz-Makeham law
//! `qx = min(A + B * exp(C * age), 1)` with separate coefficients for male,
//! female and unisex lives. The two built-in tables differ in base rate
//! (A, B) and growth rate (C):
//! - Standard Mortality: general population basis
//! - Annuitant Mortality: lighter basis for voluntary annuity purchasers
//!
//! Ages are capped at [`MAX_AGE`]; the survival curve closes there.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// Oldest age any table is defined for
pub const MAX_AGE: u32 = 120;

/// Gender selector for coefficient lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl FromStr for Gender {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "unisex" | "u" => Ok(Gender::Unisex),
            other => Err(CalcError::validation(
                "gender",
                format!("gender must be one of male, female, unisex, got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        };
        f.write_str(name)
    }
}

/// Mortality table selector
///
/// `FixedTerm` means "no mortality" and is only meaningful to the present
/// value evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Standard,
    Annuitant,
    Custom,
    FixedTerm,
}

impl TableType {
    /// Display name matching the labels the calculators accept
    pub fn name(&self) -> &'static str {
        match self {
            TableType::Standard => "Standard Mortality",
            TableType::Annuitant => "Annuitant Mortality",
            TableType::Custom => "Custom",
            TableType::FixedTerm => "None (Fixed Term)",
        }
    }

    pub fn is_fixed_term(&self) -> bool {
        matches!(self, TableType::FixedTerm)
    }
}

impl FromStr for TableType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard mortality" | "standard" | "cso 2001" | "cso_2001" => Ok(TableType::Standard),
            "annuitant mortality" | "annuitant" | "soa 2012 iam" | "soa_2012" => {
                Ok(TableType::Annuitant)
            }
            "custom" => Ok(TableType::Custom),
            "none (fixed term)" | "none" | "fixed term" | "fixed" => Ok(TableType::FixedTerm),
            other => Err(CalcError::validation(
                "table_type",
                format!("unknown mortality table '{other}'"),
            )),
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gompertz-Makeham coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GompertzMakeham {
    /// Age-independent (accident) hazard
    pub a: f64,
    /// Senescent base level
    pub b: f64,
    /// Senescent growth rate per year of age
    pub c: f64,
}

impl GompertzMakeham {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Annual probability of death at `age`, clamped to [0, 1]
    pub fn qx(&self, age: u32) -> f64 {
        let q = self.a + self.b * (self.c * age as f64).exp();
        q.clamp(0.0, 1.0)
    }
}

/// One law per gender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LawSet {
    pub male: GompertzMakeham,
    pub female: GompertzMakeham,
    pub unisex: GompertzMakeham,
}

impl LawSet {
    pub fn for_gender(&self, gender: Gender) -> &GompertzMakeham {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
            Gender::Unisex => &self.unisex,
        }
    }

    /// General population basis
    pub const fn standard() -> Self {
        Self {
            male: GompertzMakeham::new(0.0005, 0.000_03, 0.095),
            female: GompertzMakeham::new(0.0004, 0.000_02, 0.093),
            unisex: GompertzMakeham::new(0.000_45, 0.000_025, 0.094),
        }
    }

    /// Annuitant basis: lower base rates and slower growth
    pub const fn annuitant() -> Self {
        Self {
            male: GompertzMakeham::new(0.0003, 0.000_02, 0.092),
            female: GompertzMakeham::new(0.000_25, 0.000_012, 0.091),
            unisex: GompertzMakeham::new(0.000_275, 0.000_016, 0.0915),
        }
    }
}
