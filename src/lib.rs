//! Actuarial Calculators - mortality tables, annuity valuation and finance tools
//!
//! This library provides:
//! - Gompertz-Makeham mortality tables (qx, px, lx, ex, ax)
//! - Present values of fixed-term and life-contingent annuities
//! - Parallel batch valuation from CSV
//! - Black-Scholes option pricing and portfolio statistics
//! - Summaries and CSV/JSON exports of results

pub mod error;
pub mod config;
pub mod assumptions;
pub mod life_table;
pub mod annuity;
pub mod finance;
pub mod report;

// Re-export commonly used types
pub use error::{CalcError, Result};
pub use config::CalcDefaults;
pub use assumptions::{available_mortality_tables, Assumptions, Gender, TableType};
pub use life_table::{mortality_table, MortalityRow, MortalityTable};
pub use annuity::{present_value, AnnuityEvaluator, AnnuityRequest, AnnuityResult, PaymentFrequency};
pub use finance::{portfolio_metrics, price_option, PortfolioMetrics};
