//! Present value of fixed-term and life-contingent annuities
//!
//! A fixed-term annuity is valued as `payment * (1 - v^n) / (i * freq)`
//! with `n = term * freq`, or `payment * n / freq` at zero interest.
//!
//! Life-contingent payments of `payment / freq` fall at
//! `t = 1/freq, 2/freq, ..., term` (annuity-immediate), each weighted by
//! the probability of surviving to `t` with `lx` interpolated linearly
//! between integer ages. Nothing is paid once survival reaches zero at
//! `MAX_AGE + 1`, so the sum stops there however long the term.

use serde::{Deserialize, Serialize};

use super::discount::{DiscountRate, PVCalculator};
use crate::assumptions::{Assumptions, Gender, TableType};
use crate::error::{check_positive, check_range, CalcError, Result};
use crate::life_table::{validate_age, SurvivalCurve};

/// Most payments a year accepted (daily)
pub const MAX_FREQ_FACTOR: u32 = 365;

/// Inputs for one annuity valuation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnuityRequest {
    pub age: i32,
    /// Annual payment amount
    pub payment: f64,
    /// Annual effective interest rate
    pub interest_rate: f64,
    /// Term in years
    pub term: u32,
    /// Payments per year
    pub freq_factor: u32,
    pub table: TableType,
    pub gender: Gender,
}

impl AnnuityRequest {
    pub fn validate(&self) -> Result<()> {
        validate_age("age", self.age)?;
        check_positive("payment", self.payment)?;
        check_range("interest_rate", self.interest_rate, 0.0, 1.0)?;
        if self.term == 0 {
            return Err(CalcError::validation("term", "term must be > 0 years"));
        }
        if self.freq_factor == 0 || self.freq_factor > MAX_FREQ_FACTOR {
            return Err(CalcError::validation(
                "freq_factor",
                format!("freq_factor must be in [1,{MAX_FREQ_FACTOR}], got {}", self.freq_factor),
            ));
        }
        Ok(())
    }

    /// Number of payments over the term
    pub fn n_payments(&self) -> u64 {
        u64::from(self.term) * u64::from(self.freq_factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityResult {
    pub present_value: f64,
    /// Expected years of payment, never more than the term
    pub expected_duration: f64,
    /// Level monthly payment amortizing the present value over the term
    pub monthly_equivalent: f64,
}

/// Evaluates annuity requests against a set of mortality assumptions
#[derive(Debug, Clone, Default)]
pub struct AnnuityEvaluator {
    assumptions: Assumptions,
}

impl AnnuityEvaluator {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn evaluate(&self, request: &AnnuityRequest) -> Result<AnnuityResult> {
        request.validate()?;
        let rate = DiscountRate::new(request.interest_rate);

        let (present_value, expected_duration) = if request.table.is_fixed_term() {
            (fixed_term_pv(request, &rate), request.term as f64)
        } else {
            let law = self.assumptions.law(request.table, request.gender)?;
            // validate() has already bounded the age to [0, MAX_AGE]
            let curve = SurvivalCurve::new(law, request.age as u32);
            (
                life_contingent_pv(request, &rate, &curve),
                expected_duration(request.term, &curve),
            )
        };

        let months = f64::from(request.term) * 12.0;
        let monthly_equivalent = PVCalculator::amortizing_payment(present_value, months, rate.monthly_rate());

        log::debug!(
            "PV {:.2} over {} payments ({}), duration {:.4}",
            present_value,
            request.n_payments(),
            request.table,
            expected_duration
        );

        Ok(AnnuityResult {
            present_value,
            expected_duration,
            monthly_equivalent,
        })
    }
}

/// `payment * (1 - v^n) / (i * freq)`: `n` level amounts of
/// `payment / freq` discounted at the annual rate
fn fixed_term_pv(request: &AnnuityRequest, rate: &DiscountRate) -> f64 {
    let per_payment = request.payment / f64::from(request.freq_factor);
    PVCalculator::pv_annuity_immediate(per_payment, request.n_payments() as f64, rate.annual_rate)
}

fn life_contingent_pv(request: &AnnuityRequest, rate: &DiscountRate, curve: &SurvivalCurve) -> f64 {
    let freq = f64::from(request.freq_factor);
    let per_payment = request.payment / freq;
    // Survival is zero from curve.len() years on
    let last = request
        .n_payments()
        .min(curve.len() as u64 * u64::from(request.freq_factor));
    let schedule: Vec<(f64, f64, f64)> = (1..=last)
        .map(|k| {
            let t = k as f64 / freq;
            (t, curve.survival(t), per_payment)
        })
        .collect();
    PVCalculator::pv_life_annuity(&schedule, rate)
}

/// Sum of annual survival ratios over the term
fn expected_duration(term: u32, curve: &SurvivalCurve) -> f64 {
    let last = term.min(curve.len() as u32);
    let total: f64 = (1..=last).map(|t| curve.survival(f64::from(t))).sum();
    total.min(f64::from(term))
}

/// Present value from primitive arguments using the built-in assumptions
pub fn present_value(
    age: i32,
    payment: f64,
    interest_rate: f64,
    term: u32,
    freq_factor: u32,
    table_type: &str,
    gender: &str,
) -> Result<AnnuityResult> {
    log::info!(
        "Calculating present value: age {}, payment {}, interest rate {}, term {}, frequency {}",
        age, payment, interest_rate, term, freq_factor
    );

    let result = table_type
        .parse::<TableType>()
        .and_then(|table| {
            let request = AnnuityRequest {
                age,
                payment,
                interest_rate,
                term,
                freq_factor,
                table,
                gender: gender.parse()?,
            };
            AnnuityEvaluator::default().evaluate(&request)
        });

    match &result {
        Ok(r) => log::info!("Present value calculation successful: {:?}", r),
        Err(e) => log::warn!("Failed to calculate present value: {}", e),
    }
    result
}
