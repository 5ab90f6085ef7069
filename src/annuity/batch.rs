//! Batch valuation of many annuity requests
//!
//! Requests are independent, so they are valued in parallel with rayon.
//! Every input row yields its own outcome: a bad row reports its
//! validation failure without affecting the others.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::frequency::parse_freq_factor;
use super::present_value::{AnnuityEvaluator, AnnuityRequest, AnnuityResult};
use crate::error::{CalcError, Result};

/// Raw CSV row for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRow {
    pub age: i32,
    pub payment: f64,
    pub interest_rate: f64,
    pub term: u32,
    /// Either a payments-per-year count or a name such as "Monthly"
    pub frequency: String,
    pub table_type: String,
    pub gender: String,
}

impl BatchRow {
    pub fn to_request(&self) -> Result<AnnuityRequest> {
        Ok(AnnuityRequest {
            age: self.age,
            payment: self.payment,
            interest_rate: self.interest_rate,
            term: self.term,
            freq_factor: parse_freq_factor(&self.frequency)?,
            table: self.table_type.parse()?,
            gender: self.gender.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct BatchOutputRow<'a> {
    age: i32,
    payment: f64,
    interest_rate: f64,
    term: u32,
    frequency: &'a str,
    table_type: &'a str,
    gender: &'a str,
    present_value: Option<f64>,
    expected_duration: Option<f64>,
    monthly_equivalent: Option<f64>,
    error: Option<String>,
}

/// Value every request in parallel, preserving input order
pub fn evaluate_batch(evaluator: &AnnuityEvaluator, requests: &[AnnuityRequest]) -> Vec<Result<AnnuityResult>> {
    requests.par_iter().map(|req| evaluator.evaluate(req)).collect()
}

/// Parse and value raw rows, preserving input order
pub fn evaluate_rows(evaluator: &AnnuityEvaluator, rows: &[BatchRow]) -> Vec<Result<AnnuityResult>> {
    let results: Vec<Result<AnnuityResult>> = rows
        .par_iter()
        .map(|row| row.to_request().and_then(|req| evaluator.evaluate(&req)))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    log::info!("Valued {} annuity requests ({} failed)", rows.len(), failed);
    results
}

pub fn read_batch_csv<R: Read>(reader: R) -> Result<Vec<BatchRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Write inputs alongside their outcomes
pub fn write_batch_csv<W: Write>(
    writer: W,
    rows: &[BatchRow],
    results: &[Result<AnnuityResult>],
) -> Result<()> {
    if rows.len() != results.len() {
        return Err(CalcError::validation(
            "results",
            format!("{} results for {} rows", results.len(), rows.len()),
        ));
    }

    let mut writer = csv::Writer::from_writer(writer);
    for (input, result) in rows.iter().zip(results) {
        let mut out = BatchOutputRow {
            age: input.age,
            payment: input.payment,
            interest_rate: input.interest_rate,
            term: input.term,
            frequency: &input.frequency,
            table_type: &input.table_type,
            gender: &input.gender,
            present_value: None,
            expected_duration: None,
            monthly_equivalent: None,
            error: None,
        };
        match result {
            Ok(r) => {
                out.present_value = Some(r.present_value);
                out.expected_duration = Some(r.expected_duration);
                out.monthly_equivalent = Some(r.monthly_equivalent);
            }
            Err(e) => out.error = Some(e.to_string()),
        }
        writer.serialize(out)?;
    }
    writer.flush()?;
    Ok(())
}
