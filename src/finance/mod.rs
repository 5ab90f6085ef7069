//! Finance calculators: option pricing and portfolio statistics

mod options;
mod portfolio;

pub use options::{black_scholes, price_option, OptionParams, OptionQuote, OptionType};
pub use portfolio::{portfolio_metrics, series_metrics, PortfolioMetrics};
