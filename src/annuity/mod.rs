//! Annuity present value evaluation

mod discount;
mod frequency;
mod present_value;
pub mod batch;

pub use discount::{DiscountRate, PVCalculator};
pub use frequency::{parse_freq_factor, PaymentFrequency};
pub use present_value::{present_value, AnnuityEvaluator, AnnuityRequest, AnnuityResult, MAX_FREQ_FACTOR};
pub use batch::{evaluate_batch, evaluate_rows, read_batch_csv, write_batch_csv, BatchRow};
