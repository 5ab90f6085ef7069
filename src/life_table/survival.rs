//! Survival curve built from a mortality law
//!
//! The curve starts with [`RADIX`] lives at the starting age and runs to
//! [`MAX_AGE`]. Nobody survives past `MAX_AGE`, so `lx` is zero from
//! `MAX_AGE + 1` onward.

use crate::assumptions::{GompertzMakeham, MAX_AGE};

/// Initial cohort size
pub const RADIX: f64 = 100_000.0;

#[derive(Debug, Clone)]
pub struct SurvivalCurve {
    start_age: u32,
    /// `qx[k]` is the rate at `start_age + k`
    qx: Vec<f64>,
    /// `lx[k]` is the survivor count at `start_age + k`; one entry longer than `qx`
    lx: Vec<f64>,
}

impl SurvivalCurve {
    /// Build the curve for `start_age..=MAX_AGE`
    pub fn new(law: &GompertzMakeham, start_age: u32) -> Self {
        let start_age = start_age.min(MAX_AGE);
        let qx: Vec<f64> = (start_age..=MAX_AGE).map(|age| law.qx(age)).collect();

        let mut lx = Vec::with_capacity(qx.len() + 1);
        lx.push(RADIX);
        for q in &qx {
            let prev = lx[lx.len() - 1];
            lx.push(prev * (1.0 - q));
        }
        // Closes the table regardless of the law's rate at MAX_AGE
        if let Some(last) = lx.last_mut() {
            *last = 0.0;
        }

        Self { start_age, qx, lx }
    }

    pub fn start_age(&self) -> u32 {
        self.start_age
    }

    /// Mortality rate `k` years after the starting age
    pub fn qx(&self, k: usize) -> f64 {
        self.qx.get(k).copied().unwrap_or(1.0)
    }

    /// Survivors `k` whole years after the starting age
    pub fn lx(&self, k: usize) -> f64 {
        self.lx.get(k).copied().unwrap_or(0.0)
    }

    /// Number of ages covered, `start_age..=MAX_AGE`
    pub fn len(&self) -> usize {
        self.qx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qx.is_empty()
    }

    /// Probability of surviving `t` years from the starting age, with `lx`
    /// linearly interpolated between integer durations
    pub fn survival(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let whole = t.floor();
        let frac = t - whole;
        let k = whole as usize;
        let lower = self.lx(k);
        let upper = self.lx(k + 1);
        (lower + frac * (upper - lower)) / RADIX
    }

    /// Sums of `lx[k..]` for each `k`
    pub(crate) fn tail_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.lx.len() + 1];
        for k in (0..self.lx.len()).rev() {
            sums[k] = self.lx[k] + sums[k + 1];
        }
        sums
    }

    /// Discounted sums `sum_t lx[k + t] * v^t` for each `k`
    pub(crate) fn discounted_tail_sums(&self, v: f64) -> Vec<f64> {
        let mut sums = vec![0.0; self.lx.len() + 1];
        for k in (0..self.lx.len()).rev() {
            sums[k] = self.lx[k] + v * sums[k + 1];
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::LawSet;
    use approx::assert_relative_eq;

    #[test]
    fn test_curve_starts_at_radix_and_closes() {
        let curve = SurvivalCurve::new(&LawSet::annuitant().female, 65);
        assert_eq!(curve.lx(0), RADIX);
        assert_eq!(curve.len(), (MAX_AGE - 65 + 1) as usize);
        assert_eq!(curve.lx(curve.len()), 0.0);
        assert_eq!(curve.lx(500), 0.0);
    }

    #[test]
    fn test_lx_recurrence() {
        let law = LawSet::standard().male;
        let curve = SurvivalCurve::new(&law, 40);
        for k in 0..10 {
            assert_relative_eq!(
                curve.lx(k + 1),
                curve.lx(k) * (1.0 - law.qx(40 + k as u32)),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_survival_interpolates_linearly() {
        let curve = SurvivalCurve::new(&LawSet::standard().male, 70);
        let s1 = curve.lx(1) / RADIX;
        let s2 = curve.lx(2) / RADIX;
        assert_eq!(curve.survival(0.0), 1.0);
        assert_relative_eq!(curve.survival(1.0), s1);
        assert_relative_eq!(curve.survival(1.5), (s1 + s2) / 2.0, max_relative = 1e-12);
        assert_relative_eq!(curve.survival(0.25), 1.0 - 0.25 * (1.0 - s1), max_relative = 1e-12);
    }

    #[test]
    fn test_tail_sums() {
        let curve = SurvivalCurve::new(&LawSet::standard().unisex, 100);
        let sums = curve.tail_sums();
        let direct: f64 = (0..=curve.len()).map(|k| curve.lx(k)).sum();
        assert_relative_eq!(sums[0], direct, max_relative = 1e-12);

        let v: f64 = 1.0 / 1.04;
        let discounted = curve.discounted_tail_sums(v);
        let direct: f64 = (0..=curve.len()).map(|k| curve.lx(k) * v.powi(k as i32)).sum();
        assert_relative_eq!(discounted[0], direct, max_relative = 1e-12);
    }
}
