//! Summaries, text rendering and file exports of calculation results

use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::annuity::{AnnuityRequest, AnnuityResult, PaymentFrequency};
use crate::error::{CalcError, Result};
use crate::life_table::MortalityTable;

/// Summary statistics over a mortality table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalitySummary {
    pub min_age: u32,
    pub max_age: u32,
    pub mean_qx: f64,
    pub median_qx: f64,
    pub mean_ex: f64,
    pub min_ex: f64,
    pub max_ex: f64,
}

impl MortalitySummary {
    pub fn from_table(table: &MortalityTable) -> Result<Self> {
        let rows = table.rows();
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(CalcError::validation("table", "cannot summarize an empty table")),
        };

        let n = rows.len() as f64;
        let mut qx: Vec<f64> = rows.iter().map(|r| r.qx).collect();
        qx.sort_by(f64::total_cmp);
        let mid = qx.len() / 2;
        let median_qx = if qx.len() % 2 == 0 {
            (qx[mid - 1] + qx[mid]) / 2.0
        } else {
            qx[mid]
        };

        Ok(Self {
            min_age: first.age,
            max_age: last.age,
            mean_qx: qx.iter().sum::<f64>() / n,
            median_qx,
            mean_ex: rows.iter().map(|r| r.ex).sum::<f64>() / n,
            min_ex: rows.iter().map(|r| r.ex).fold(f64::INFINITY, f64::min),
            max_ex: rows.iter().map(|r| r.ex).fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

impl fmt::Display for MortalitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Age range:               {} - {}", self.min_age, self.max_age)?;
        writeln!(f, "Average mortality:       {:.4}", self.mean_qx)?;
        writeln!(f, "Median mortality:        {:.4}", self.median_qx)?;
        writeln!(f, "Average life expectancy: {:.2} years", self.mean_ex)?;
        write!(f, "Life expectancy range:   {:.2} - {:.2} years", self.min_ex, self.max_ex)
    }
}

/// Display-ready present value figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentValueSummary {
    pub present_value: String,
    pub expected_duration: String,
    pub monthly_equivalent: String,
    pub narrative: String,
}

impl PresentValueSummary {
    pub fn new(request: &AnnuityRequest, result: &AnnuityResult) -> Self {
        let frequency = PaymentFrequency::from_factor(request.freq_factor)
            .map(|f| f.name().to_lowercase())
            .unwrap_or_else(|| format!("{}-times-yearly", request.freq_factor));
        let basis = if request.table.is_fixed_term() {
            format!("{} years certain", request.term)
        } else {
            format!("{} years or life ({}, {})", request.term, request.table, request.gender)
        };

        let narrative = format!(
            "Present Value: {pv}\n\n\
             This represents the lump sum amount needed today to fund the specified stream of payments.\n\n\
             Based on a {frequency} payment schedule of {payment} a year for {basis}, \
             using an interest rate of {rate:.2}%.\n\n\
             The expected duration of payments is {duration:.2} years.",
            pv = format_currency(result.present_value),
            payment = format_currency(request.payment),
            rate = request.interest_rate * 100.0,
            duration = result.expected_duration,
        );

        Self {
            present_value: format_currency(result.present_value),
            expected_duration: format!("{:.2} years", result.expected_duration),
            monthly_equivalent: format!("{} / month", format_currency(result.monthly_equivalent)),
            narrative,
        }
    }
}

/// `$1,234,567.89` style formatting
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Fixed-width text rendering of a mortality table
pub fn mortality_text(table: &MortalityTable) -> String {
    let mut out = format!(
        "Mortality Data ({}, {}, i = {:.2}%):\n\n",
        table.table,
        table.gender,
        table.interest_rate * 100.0
    );
    out.push_str(&format!(
        "{:>5} {:>10} {:>10} {:>12} {:>8} {:>8}\n",
        "Age", "qx", "px", "lx", "ex", "ax"
    ));
    for row in table.rows() {
        out.push_str(&format!(
            "{:>5} {:>10.6} {:>10.6} {:>12.2} {:>8.2} {:>8.4}\n",
            row.age, row.qx, row.px, row.lx, row.ex, row.ax
        ));
    }
    out
}

/// `dir/mortality_data_<timestamp>.<ext>`
pub fn default_export_path(dir: &Path, extension: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("mortality_data_{timestamp}.{extension}"))
}

/// Write the table rows as CSV with columns `Age,qx,px,lx,ex,ax`
pub fn export_csv(table: &MortalityTable, path: &Path) -> Result<()> {
    ensure_not_empty(table)?;
    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("Exported {} mortality rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the table rows as a JSON array of records
pub fn export_json(table: &MortalityTable, path: &Path) -> Result<()> {
    ensure_not_empty(table)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, table.rows())?;
    writer.flush()?;
    log::info!("Exported {} mortality rows to {}", table.len(), path.display());
    Ok(())
}

fn ensure_not_empty(table: &MortalityTable) -> Result<()> {
    if table.is_empty() {
        return Err(CalcError::validation("table", "cannot export an empty table"));
    }
    Ok(())
}
