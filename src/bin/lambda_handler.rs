//! AWS Lambda handler for the calculators
//!
//! Accepts a JSON event tagged by `operation` and returns the matching
//! calculation result, or `{"error": ..., "field": ...}` when the inputs are
//! rejected.

use actuarial_calc::annuity::{parse_freq_factor, AnnuityEvaluator, AnnuityRequest, AnnuityResult};
use actuarial_calc::assumptions::{Assumptions, TableInfo};
use actuarial_calc::finance::{black_scholes, portfolio_metrics, OptionParams, OptionQuote, PortfolioMetrics};
use actuarial_calc::life_table::{mortality_table_with, MortalityRow};
use actuarial_calc::report::{MortalitySummary, PresentValueSummary};
use actuarial_calc::{CalcDefaults, CalcError};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Input for one invocation
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CalcRequest {
    MortalityTable {
        #[serde(default)]
        age_from: Option<i32>,
        #[serde(default)]
        age_to: Option<i32>,
        #[serde(default)]
        interest_rate: Option<f64>,
        #[serde(default)]
        table_type: Option<String>,
        #[serde(default)]
        gender: Option<String>,
    },
    PresentValue {
        #[serde(default)]
        age: Option<i32>,
        #[serde(default)]
        payment: Option<f64>,
        #[serde(default)]
        interest_rate: Option<f64>,
        #[serde(default)]
        term: Option<u32>,
        /// Payments per year or a frequency name
        #[serde(default)]
        frequency: Option<String>,
        #[serde(default)]
        table_type: Option<String>,
        #[serde(default)]
        gender: Option<String>,
    },
    PriceOption(OptionParams),
    PortfolioMetrics {
        returns: Vec<Vec<f64>>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    AvailableTables,
}

/// Output from the calculation
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CalcResponse {
    MortalityTable {
        rows: Vec<MortalityRow>,
        summary: MortalitySummary,
    },
    PresentValue {
        #[serde(flatten)]
        result: AnnuityResult,
        summary: PresentValueSummary,
    },
    Quote(OptionQuote),
    Portfolio(PortfolioMetrics),
    Tables { tables: Vec<TableInfo> },
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
    },
}

impl From<CalcError> for CalcResponse {
    fn from(e: CalcError) -> Self {
        CalcResponse::Error {
            field: e.field(),
            error: e.to_string(),
        }
    }
}

fn calculate(
    request: CalcRequest,
    defaults: &CalcDefaults,
    assumptions: &Assumptions,
) -> Result<CalcResponse, CalcError> {
    match request {
        CalcRequest::MortalityTable {
            age_from,
            age_to,
            interest_rate,
            table_type,
            gender,
        } => {
            let table = mortality_table_with(
                assumptions,
                age_from.unwrap_or(defaults.age_from),
                age_to.unwrap_or(defaults.age_to),
                interest_rate.unwrap_or(defaults.interest_rate),
                table_type.as_deref().unwrap_or(&defaults.table_type),
                gender.as_deref().unwrap_or(&defaults.gender),
            )?;
            let summary = MortalitySummary::from_table(&table)?;
            Ok(CalcResponse::MortalityTable {
                rows: table.rows,
                summary,
            })
        }
        CalcRequest::PresentValue {
            age,
            payment,
            interest_rate,
            term,
            frequency,
            table_type,
            gender,
        } => {
            let request = AnnuityRequest {
                age: age.unwrap_or(defaults.pv_age),
                payment: payment.unwrap_or(defaults.payment),
                interest_rate: interest_rate.unwrap_or(defaults.interest_rate),
                term: term.unwrap_or(defaults.term),
                freq_factor: parse_freq_factor(frequency.as_deref().unwrap_or(&defaults.frequency))?,
                table: table_type.as_deref().unwrap_or(&defaults.table_type).parse()?,
                gender: gender.as_deref().unwrap_or(&defaults.gender).parse()?,
            };
            let result = AnnuityEvaluator::new(assumptions.clone()).evaluate(&request)?;
            Ok(CalcResponse::PresentValue {
                result,
                summary: PresentValueSummary::new(&request, &result),
            })
        }
        CalcRequest::PriceOption(params) => Ok(CalcResponse::Quote(black_scholes(&params)?)),
        CalcRequest::PortfolioMetrics { returns, weights } => Ok(CalcResponse::Portfolio(
            portfolio_metrics(&returns, weights.as_deref())?,
        )),
        CalcRequest::AvailableTables => Ok(CalcResponse::Tables {
            tables: assumptions.available_tables(),
        }),
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<CalcRequest>) -> Result<CalcResponse, Error> {
    let start = std::time::Instant::now();
    let defaults = CalcDefaults::default();
    let assumptions = defaults.assumptions()?;

    let response = calculate(event.payload, &defaults, &assumptions).unwrap_or_else(|e| {
        log::warn!("Rejected request: {}", e);
        CalcResponse::from(e)
    });

    log::info!("Request {} handled in {:?}", event.context.request_id, start.elapsed());
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(json: &str) -> serde_json::Value {
        let request: CalcRequest = serde_json::from_str(json).unwrap();
        let defaults = CalcDefaults::default();
        let response = calculate(request, &defaults, &Assumptions::default()).unwrap_or_else(CalcResponse::from);
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_mortality_table_operation() {
        let value = call(r#"{"operation": "mortality_table", "age_from": 60, "age_to": 62}"#);
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["rows"][0]["Age"], 60);
        assert_eq!(value["summary"]["min_age"], 60);
    }

    #[test]
    fn test_present_value_uses_defaults() {
        let value = call(r#"{"operation": "present_value", "table_type": "fixed", "interest_rate": 0.0, "term": 10, "payment": 100}"#);
        assert_eq!(value["present_value"], 1000.0);
        assert_eq!(value["expected_duration"], 10.0);
        assert_eq!(value["summary"]["present_value"], "$1,000.00");
    }

    #[test]
    fn test_price_option_operation() {
        let value = call(
            r#"{"operation": "price_option", "option_type": "call", "spot_price": 100, "strike_price": 100,
                "time_to_expiry": 1, "risk_free_rate": 0.05, "volatility": 0.2}"#,
        );
        let price = value["price"].as_f64().unwrap();
        assert!((price - 10.4506).abs() < 1e-3);
    }

    #[test]
    fn test_validation_error_payload() {
        let value = call(r#"{"operation": "present_value", "age": 130}"#);
        assert_eq!(value["field"], "age");
        assert!(value["error"].as_str().unwrap().contains("age"));
    }

    #[test]
    fn test_available_tables_operation() {
        let value = call(r#"{"operation": "available_tables"}"#);
        assert_eq!(value["tables"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        assert!(serde_json::from_str::<CalcRequest>(r#"{"operation": "yield_curve"}"#).is_err());
    }
}
