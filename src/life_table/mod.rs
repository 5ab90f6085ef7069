//! Mortality table generation
//!
//! Produces one row per age in `[age_from, age_to]`:
//! - `qx`, `px` from the selected law
//! - `lx` starting at [`RADIX`] for `age_from`
//! - `ex = sum(lx[i..]) / lx[i] - 0.5`
//! - `ax = sum_t tpx * v^t` for t = 0, 1, ... (annuity-due)
//!
//! `ex` and `ax` run over the full curve to [`MAX_AGE`], not just the rows
//! requested, so a narrow age range does not truncate them.

mod survival;

pub use survival::{SurvivalCurve, RADIX};

use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, Gender, GompertzMakeham, TableType, MAX_AGE};
use crate::error::{check_range, CalcError, Result};

/// One age of a mortality table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortalityRow {
    #[serde(rename = "Age")]
    pub age: u32,
    pub qx: f64,
    pub px: f64,
    pub lx: f64,
    pub ex: f64,
    pub ax: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MortalityTable {
    pub table: TableType,
    pub gender: Gender,
    pub interest_rate: f64,
    pub rows: Vec<MortalityRow>,
}

impl MortalityTable {
    /// Validate inputs and generate the table from the given assumptions
    pub fn generate(
        assumptions: &Assumptions,
        age_from: i32,
        age_to: i32,
        interest_rate: f64,
        table: TableType,
        gender: Gender,
    ) -> Result<Self> {
        let from = validate_age("age_from", age_from)?;
        let to = validate_age("age_to", age_to)?;
        if from > to {
            return Err(CalcError::validation(
                "age_from",
                format!("age_from ({from}) must not exceed age_to ({to})"),
            ));
        }
        check_range("interest_rate", interest_rate, 0.0, 1.0)?;

        let law = assumptions.law(table, gender)?;
        let rows = Self::rows_from_law(law, from, to, interest_rate);

        Ok(Self {
            table,
            gender,
            interest_rate,
            rows,
        })
    }

    /// Rows for `from..=to` under `law`; inputs are assumed valid
    pub fn rows_from_law(law: &GompertzMakeham, from: u32, to: u32, interest_rate: f64) -> Vec<MortalityRow> {
        let curve = SurvivalCurve::new(law, from);
        let v = 1.0 / (1.0 + interest_rate);
        let tail = curve.tail_sums();
        let discounted = curve.discounted_tail_sums(v);

        (0..=(to - from) as usize)
            .map(|k| {
                let qx = curve.qx(k);
                let lx = curve.lx(k);
                let (ex, ax) = if lx > 0.0 {
                    (tail[k] / lx - 0.5, discounted[k] / lx)
                } else {
                    (0.0, 0.0)
                };
                MortalityRow {
                    age: from + k as u32,
                    qx,
                    px: 1.0 - qx,
                    lx,
                    ex,
                    ax,
                }
            })
            .collect()
    }

    pub fn rows(&self) -> &[MortalityRow] {
        &self.rows
    }

    pub fn row(&self, age: u32) -> Option<&MortalityRow> {
        let first = self.rows.first()?.age;
        age.checked_sub(first).and_then(|k| self.rows.get(k as usize))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Generate a mortality table from primitive arguments using the built-in
/// assumptions
pub fn mortality_table(
    age_from: i32,
    age_to: i32,
    interest_rate: f64,
    table_type: &str,
    gender: &str,
) -> Result<MortalityTable> {
    mortality_table_with(&Assumptions::default(), age_from, age_to, interest_rate, table_type, gender)
}

/// As [`mortality_table`], resolving the table against `assumptions`
pub fn mortality_table_with(
    assumptions: &Assumptions,
    age_from: i32,
    age_to: i32,
    interest_rate: f64,
    table_type: &str,
    gender: &str,
) -> Result<MortalityTable> {
    log::info!(
        "Calculating mortality data: ages {}-{}, interest rate {}, table {}, gender {}",
        age_from, age_to, interest_rate, table_type, gender
    );

    let result = table_type
        .parse::<TableType>()
        .and_then(|table| Ok((table, gender.parse::<Gender>()?)))
        .and_then(|(table, gender)| {
            MortalityTable::generate(assumptions, age_from, age_to, interest_rate, table, gender)
        });

    match &result {
        Ok(table) => log::info!("Mortality calculation successful, returning {} rows", table.len()),
        Err(e) => log::warn!("Failed to calculate mortality data: {}", e),
    }
    result
}

pub(crate) fn validate_age(field: &'static str, age: i32) -> Result<u32> {
    check_range(field, age as f64, 0.0, MAX_AGE as f64)?;
    Ok(age as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::LawSet;
    use approx::assert_relative_eq;

    #[test]
    fn test_three_row_scenario() {
        let table = mortality_table(60, 62, 0.03, "Standard Mortality", "male").unwrap();
        let ages: Vec<u32> = table.rows().iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![60, 61, 62]);

        let q60 = LawSet::standard().male.qx(60);
        assert_eq!(table.rows[0].lx, 100_000.0);
        assert_relative_eq!(table.rows[1].lx, 100_000.0 * (1.0 - q60), max_relative = 1e-12);
        assert_relative_eq!(table.rows[0].qx, q60);
        assert_relative_eq!(table.rows[0].px, 1.0 - q60);
    }

    #[test]
    fn test_lx_non_increasing_full_range() {
        let table = mortality_table(0, 120, 0.035, "Annuitant Mortality", "female").unwrap();
        assert_eq!(table.len(), 121);
        assert_eq!(table.rows[0].lx, RADIX);
        for pair in table.rows.windows(2) {
            assert!(pair[1].lx <= pair[0].lx);
            assert!(pair[1].qx >= pair[0].qx);
        }
        for row in table.rows() {
            assert!((0.0..=1.0).contains(&row.qx));
            assert!((0.0..=1.0).contains(&row.px));
        }
    }

    #[test]
    fn test_life_expectancy_matches_definition() {
        let law = LawSet::standard().unisex;
        let table = mortality_table(80, 80, 0.0, "standard", "unisex").unwrap();
        let curve = SurvivalCurve::new(&law, 80);
        let total: f64 = (0..=curve.len()).map(|k| curve.lx(k)).sum();
        assert_relative_eq!(table.rows[0].ex, total / RADIX - 0.5, max_relative = 1e-12);
        // At zero interest the annuity-due factor is the curtate expectancy plus one
        assert_relative_eq!(table.rows[0].ax, table.rows[0].ex + 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_annuity_factor_falls_with_interest() {
        let low = mortality_table(65, 65, 0.02, "standard", "male").unwrap();
        let high = mortality_table(65, 65, 0.06, "standard", "male").unwrap();
        assert!(high.rows[0].ax < low.rows[0].ax);
        assert!(low.rows[0].ax > 1.0);
        // Life expectancy does not depend on the rate
        assert_relative_eq!(low.rows[0].ex, high.rows[0].ex);
    }

    #[test]
    fn test_ex_is_age_dependent_not_range_dependent() {
        let wide = mortality_table(60, 90, 0.03, "standard", "female").unwrap();
        let narrow = mortality_table(75, 76, 0.03, "standard", "female").unwrap();
        let from_wide = wide.row(75).unwrap();
        assert_relative_eq!(from_wide.ex, narrow.rows[0].ex, max_relative = 1e-9);
        assert_relative_eq!(from_wide.ax, narrow.rows[0].ax, max_relative = 1e-9);
    }

    #[test]
    fn test_terminal_rows() {
        let table = mortality_table(115, 120, 0.03, "standard", "male").unwrap();
        let last = table.row(120).unwrap();
        assert_eq!(last.qx, 1.0);
        for row in table.rows() {
            assert!(row.ex >= 0.0);
            assert!(row.ax >= 0.0);
        }
    }

    #[test]
    fn test_validation_failures() {
        let err = mortality_table(70, 60, 0.03, "standard", "male").unwrap_err();
        assert_eq!(err.field(), Some("age_from"));

        let err = mortality_table(-1, 60, 0.03, "standard", "male").unwrap_err();
        assert_eq!(err.field(), Some("age_from"));

        let err = mortality_table(60, 130, 0.03, "standard", "male").unwrap_err();
        assert_eq!(err.field(), Some("age_to"));

        let err = mortality_table(60, 70, 1.5, "standard", "male").unwrap_err();
        assert_eq!(err.field(), Some("interest_rate"));

        let err = mortality_table(60, 70, 0.03, "None (Fixed Term)", "male").unwrap_err();
        assert_eq!(err.field(), Some("table_type"));

        let err = mortality_table(60, 70, 0.03, "standard", "x").unwrap_err();
        assert_eq!(err.field(), Some("gender"));
    }

    #[test]
    fn test_row_lookup() {
        let table = mortality_table(30, 40, 0.03, "standard", "male").unwrap();
        assert_eq!(table.row(35).unwrap().age, 35);
        assert!(table.row(29).is_none());
        assert!(table.row(41).is_none());
    }
}
