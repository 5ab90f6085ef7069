//! Discounting helpers for annuity valuation
//!
//! A single annual effective rate drives everything:
//! - `v^t = (1 + i)^-t` for payments at fractional times
//! - `a_n = (1 - v^n) / i` for level annuities certain
//! - a nominal monthly rate `i / 12` for the monthly-equivalent payment
//!
//! Period counts are `f64` so very long terms neither overflow nor wrap.

use serde::{Deserialize, Serialize};

/// Annual effective discount rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRate {
    pub annual_rate: f64,
}

impl DiscountRate {
    pub fn new(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// One-year discount factor `v = 1 / (1 + i)`
    pub fn v(&self) -> f64 {
        1.0 / (1.0 + self.annual_rate)
    }

    /// Discount factor to time `t` years
    pub fn discount_factor(&self, t: f64) -> f64 {
        (1.0 + self.annual_rate).powf(-t)
    }

    /// Nominal monthly rate used for amortization
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }
}

/// Helper functions for present value calculations
pub struct PVCalculator;

impl PVCalculator {
    /// PV of a level annuity-immediate: `amount` at the end of each of
    /// `n_periods` periods
    pub fn pv_annuity_immediate(amount: f64, n_periods: f64, periodic_rate: f64) -> f64 {
        if periodic_rate == 0.0 {
            return amount * n_periods;
        }
        amount * one_minus_v_n(n_periods, periodic_rate) / periodic_rate
    }

    /// Level payment at the end of each period that amortizes `pv`
    pub fn amortizing_payment(pv: f64, n_periods: f64, periodic_rate: f64) -> f64 {
        if n_periods <= 0.0 {
            return 0.0;
        }
        if periodic_rate == 0.0 {
            return pv / n_periods;
        }
        pv * periodic_rate / one_minus_v_n(n_periods, periodic_rate)
    }

    /// PV of a life annuity from `(time_in_years, survival_prob, payment)` tuples
    pub fn pv_life_annuity(payments: &[(f64, f64, f64)], rate: &DiscountRate) -> f64 {
        payments
            .iter()
            .map(|(t, surv_prob, payment)| surv_prob * payment * rate.discount_factor(*t))
            .sum()
    }
}

/// `1 - (1 + rate)^-n`, accurate for rates close to zero
fn one_minus_v_n(n: f64, rate: f64) -> f64 {
    -(-n * rate.ln_1p()).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factors() {
        let rate = DiscountRate::new(0.06);
        assert_relative_eq!(rate.v(), 1.0 / 1.06, max_relative = 1e-12);
        assert_relative_eq!(rate.discount_factor(2.0), 1.0 / (1.06 * 1.06), max_relative = 1e-12);
        assert_relative_eq!(rate.monthly_rate(), 0.005, max_relative = 1e-12);
    }

    #[test]
    fn test_pv_annuity() {
        // $100/month for 12 months at 0.5% per month
        let pv = PVCalculator::pv_annuity_immediate(100.0, 12.0, 0.005);

        // Expected: 100 * (1 - 1.005^-12) / 0.005 ≈ 1161.89
        assert!((pv - 1161.89).abs() < 0.01);
        assert_eq!(PVCalculator::pv_annuity_immediate(100.0, 12.0, 0.0), 1200.0);
    }

    #[test]
    fn test_tiny_rate_approaches_sum_of_payments() {
        let pv = PVCalculator::pv_annuity_immediate(100.0, 120.0, 1e-15);
        assert_relative_eq!(pv, 12_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_period_counts_beyond_i32() {
        // 2^32 + 1 periods would wrap to 1 as an i32
        let n = u32::MAX as f64 + 2.0;
        let pv = PVCalculator::pv_annuity_immediate(50.0, n, 0.01);
        assert_relative_eq!(pv, 5_000.0, max_relative = 1e-12);
        let payment = PVCalculator::amortizing_payment(5_000.0, n, 0.01);
        assert_relative_eq!(payment, 50.0, max_relative = 1e-12);
    }

    #[test]
    fn test_amortization_inverts_annuity() {
        let pv = PVCalculator::pv_annuity_immediate(250.0, 240.0, 0.004);
        let payment = PVCalculator::amortizing_payment(pv, 240.0, 0.004);
        assert_relative_eq!(payment, 250.0, max_relative = 1e-10);

        assert_relative_eq!(PVCalculator::amortizing_payment(1200.0, 12.0, 0.0), 100.0);
        assert_eq!(PVCalculator::amortizing_payment(1200.0, 0.0, 0.01), 0.0);
    }

    #[test]
    fn test_pv_life_annuity() {
        let rate = DiscountRate::new(0.05);
        let payments = [(1.0, 0.9, 100.0), (2.0, 0.8, 100.0)];
        let pv = PVCalculator::pv_life_annuity(&payments, &rate);
        let expected = 90.0 / 1.05 + 80.0 / (1.05 * 1.05);
        assert_relative_eq!(pv, expected, max_relative = 1e-12);
    }
}
