//! Black-Scholes pricing of European options with a continuous dividend
//! yield
//!
//! Greeks are reported in desk units:
//! - `vega` per 1% move in volatility
//! - `theta` per calendar day (annual theta / 365)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{check_positive, CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl FromStr for OptionType {
    type Err = CalcError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(CalcError::validation(
                "option_type",
                format!("option_type must be 'call' or 'put', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("call"),
            OptionType::Put => f.write_str("put"),
        }
    }
}

/// Contract and market inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    pub option_type: OptionType,
    pub spot_price: f64,
    pub strike_price: f64,
    /// Years to expiry
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
    #[serde(default)]
    pub dividend_yield: f64,
}

impl OptionParams {
    pub fn validate(&self) -> Result<()> {
        check_positive("spot_price", self.spot_price)?;
        check_positive("strike_price", self.strike_price)?;
        check_positive("time_to_expiry", self.time_to_expiry)?;
        check_positive("volatility", self.volatility)?;
        if !self.risk_free_rate.is_finite() {
            return Err(CalcError::validation("risk_free_rate", "risk_free_rate must be finite"));
        }
        if !self.dividend_yield.is_finite() {
            return Err(CalcError::validation("dividend_yield", "dividend_yield must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

/// Price an option and its Greeks
pub fn black_scholes(params: &OptionParams) -> Result<OptionQuote> {
    params.validate()?;

    let OptionParams {
        option_type,
        spot_price: s,
        strike_price: k,
        time_to_expiry: t,
        risk_free_rate: r,
        volatility: sigma,
        dividend_yield: q,
    } = *params;

    let sqrt_t = t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;

    let div_df = (-q * t).exp();
    let rate_df = (-r * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let gamma = div_df * pdf_d1 / (s * sigma * sqrt_t);
    let vega = 0.01 * s * div_df * sqrt_t * pdf_d1;
    let decay = -(s * sigma * div_df * pdf_d1) / (2.0 * sqrt_t);

    let (price, delta, annual_theta) = match option_type {
        OptionType::Call => (
            s * div_df * norm_cdf(d1) - k * rate_df * norm_cdf(d2),
            div_df * norm_cdf(d1),
            decay - r * k * rate_df * norm_cdf(d2) + q * s * div_df * norm_cdf(d1),
        ),
        OptionType::Put => (
            k * rate_df * norm_cdf(-d2) - s * div_df * norm_cdf(-d1),
            div_df * (norm_cdf(d1) - 1.0),
            decay + r * k * rate_df * norm_cdf(-d2) - q * s * div_df * norm_cdf(-d1),
        ),
    };

    Ok(OptionQuote {
        price,
        delta,
        gamma,
        theta: annual_theta / 365.0,
        vega,
    })
}

/// Price an option from primitive arguments
pub fn price_option(
    option_type: &str,
    spot_price: f64,
    strike_price: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    volatility: f64,
    dividend_yield: f64,
) -> Result<OptionQuote> {
    log::info!(
        "Pricing {} option: S={}, K={}, T={}, r={}, sigma={}",
        option_type, spot_price, strike_price, time_to_expiry, risk_free_rate, volatility
    );

    let result = option_type.parse().and_then(|option_type| {
        black_scholes(&OptionParams {
            option_type,
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            volatility,
            dividend_yield,
        })
    });

    match &result {
        Ok(quote) => log::info!("Option pricing successful: {:?}", quote),
        Err(e) => log::warn!("Failed to price option: {}", e),
    }
    result
}

/// Standard normal PDF
fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF (Abramowitz & Stegun 26.2.17)
fn norm_cdf(x: f64) -> f64 {
    const B1: f64 = 0.319381530;
    const B2: f64 = -0.356563782;
    const B3: f64 = 1.781477937;
    const B4: f64 = -1.821255978;
    const B5: f64 = 1.330274429;
    const P: f64 = 0.2316419;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let cdf_pos = 1.0 - norm_pdf(abs_x) * poly;

    if x < 0.0 {
        1.0 - cdf_pos
    } else {
        cdf_pos
    }
}
