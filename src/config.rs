//! Default inputs for the calculators
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assumptions::Assumptions;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcDefaults {
    pub age_from: i32,
    pub age_to: i32,
    pub interest_rate: f64,
    pub table_type: String,
    pub gender: String,
    /// Age at which present values start
    pub pv_age: i32,
    pub payment: f64,
    pub term: u32,
    pub frequency: String,
    /// CSV of `gender,a,b,c` enabling the "Custom" table
    pub custom_law_path: Option<PathBuf>,
}

impl Default for CalcDefaults {
    fn default() -> Self {
        Self {
            age_from: 30,
            age_to: 90,
            interest_rate: 0.035,
            table_type: "Standard Mortality".to_string(),
            gender: "male".to_string(),
            pv_age: 65,
            payment: 10_000.0,
            term: 20,
            frequency: "Annual".to_string(),
            custom_law_path: None,
        }
    }
}

impl CalcDefaults {
    /// Read defaults from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let defaults: Self = serde_json::from_reader(reader)?;
        log::info!("Loaded calculation defaults from {}", path.display());
        Ok(defaults)
    }

    /// Built-in assumptions, plus the custom law when one is configured
    pub fn assumptions(&self) -> Result<Assumptions> {
        match &self.custom_law_path {
            Some(path) => Assumptions::with_custom_csv(path),
            None => Ok(Assumptions::default()),
        }
    }
}
