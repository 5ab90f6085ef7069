//! CSV-based loader for custom mortality law coefficients
//!
//! Expected columns: `gender,a,b,c` with one row each for male, female and
//! unisex lives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::mortality::{Gender, GompertzMakeham, LawSet};
use crate::error::{CalcError, Result};

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    gender: String,
    a: f64,
    b: f64,
    c: f64,
}

/// Load a custom law set from a CSV file
pub fn load_custom_law(path: &Path) -> Result<LawSet> {
    let file = File::open(path)?;
    let laws = read_custom_law(file)?;
    log::info!("Loaded custom mortality law from {}", path.display());
    Ok(laws)
}

/// Parse a custom law set from any CSV reader
pub fn read_custom_law<R: Read>(reader: R) -> Result<LawSet> {
    let mut reader = csv::Reader::from_reader(reader);

    let mut male = None;
    let mut female = None;
    let mut unisex = None;

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let gender: Gender = row.gender.parse()?;
        if !(row.b > 0.0 && row.c > 0.0) || row.a < 0.0 {
            return Err(CalcError::validation(
                "custom_law",
                format!("{gender} coefficients must satisfy a >= 0, b > 0, c > 0"),
            ));
        }
        let law = GompertzMakeham::new(row.a, row.b, row.c);
        match gender {
            Gender::Male => male = Some(law),
            Gender::Female => female = Some(law),
            Gender::Unisex => unisex = Some(law),
        }
    }

    let missing = |g: Gender| CalcError::validation("custom_law", format!("missing coefficients for {g}"));

    Ok(LawSet {
        male: male.ok_or_else(|| missing(Gender::Male))?,
        female: female.ok_or_else(|| missing(Gender::Female))?,
        unisex: unisex.ok_or_else(|| missing(Gender::Unisex))?,
    })
}
