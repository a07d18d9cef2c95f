use serde::{Deserialize, Serialize};

use crate::error::SizingError;
use crate::models::instrument::{self, DEFAULT_PIP_DECIMAL};
use crate::models::TradeType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentChoice {
    Listed(String),
    /// Caller-supplied pip value; pip decimal falls back to `DEFAULT_PIP_DECIMAL`.
    Custom {
        pip_value: Option<f64>,
        pip_decimal: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum StopLossMethod {
    PipsDirect {
        pips: Option<f64>,
    },
    PriceBased {
        entry_price: Option<f64>,
        stop_loss_price: Option<f64>,
        trade_type: TradeType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub capital: f64,
    /// Percentage points: `1.0` means 1%.
    pub risk_percentage: f64,
    pub instrument: InstrumentChoice,
    pub stop_loss: StopLossMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionResult {
    pub lot_size: f64,
    pub pip_value: f64,
    pub amount_risked: f64,
    pub pips: f64,
}

/// Sizes a position so that hitting the stop loses `risk_percentage` of `capital`.
pub fn compute_position(input: &CalculatorInput) -> Result<PositionResult, SizingError> {
    let (pip_value, pip_decimal) = resolve_instrument(&input.instrument)?;
    let pips = resolve_pips(&input.stop_loss, pip_decimal)?;

    require_positive("capital", input.capital)?;
    require_positive("risk percentage", input.risk_percentage)?;
    require_positive("stop distance (pips)", pips)?;
    require_positive("pip value", pip_value)?;

    let amount_to_risk = input.capital * input.risk_percentage / 100.0;
    let lot_size = amount_to_risk / (pips * pip_value);

    Ok(PositionResult {
        lot_size: round2(lot_size),
        pip_value: round2(pip_value),
        amount_risked: round2(amount_to_risk),
        pips: round1(pips),
    })
}

fn resolve_instrument(choice: &InstrumentChoice) -> Result<(f64, f64), SizingError> {
    match choice {
        InstrumentChoice::Listed(symbol) => instrument::lookup(symbol)
            .map(|s| (s.pip_value, s.pip_decimal))
            .ok_or_else(|| SizingError::InvalidInput(format!("unknown instrument '{}'", symbol))),
        InstrumentChoice::Custom {
            pip_value,
            pip_decimal,
        } => {
            let pip_value = pip_value.ok_or_else(|| {
                SizingError::InvalidInput("custom instrument needs a pip value".to_string())
            })?;
            let pip_decimal = pip_decimal.unwrap_or(DEFAULT_PIP_DECIMAL);
            require_positive("pip decimal", pip_decimal)?;
            Ok((pip_value, pip_decimal))
        }
    }
}

fn resolve_pips(method: &StopLossMethod, pip_decimal: f64) -> Result<f64, SizingError> {
    match method {
        StopLossMethod::PipsDirect { pips } => pips.ok_or_else(|| {
            SizingError::InvalidInput("stop loss in pips is required".to_string())
        }),
        StopLossMethod::PriceBased {
            entry_price,
            stop_loss_price,
            ..
        } => match (entry_price, stop_loss_price) {
            (Some(entry), Some(sl))
                if entry.is_finite() && sl.is_finite() && *entry != 0.0 && *sl != 0.0 =>
            {
                Ok((entry - sl).abs() / pip_decimal)
            }
            _ => Err(SizingError::InvalidInput(
                "valid entry and stop loss prices are required".to_string(),
            )),
        },
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}

/// Keeps the last successful result. A failed calculation leaves it as it was.
#[derive(Debug, Default)]
pub struct PositionCalculator {
    last_result: Option<PositionResult>,
}

impl PositionCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate(&mut self, input: &CalculatorInput) -> Result<&PositionResult, SizingError> {
        let result = compute_position(input)?;
        Ok(self.last_result.insert(result))
    }

    pub fn last_result(&self) -> Option<&PositionResult> {
        self.last_result.as_ref()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pips_input(capital: f64, risk: f64, pips: Option<f64>, pip_value: f64) -> CalculatorInput {
        CalculatorInput {
            capital,
            risk_percentage: risk,
            instrument: InstrumentChoice::Custom {
                pip_value: Some(pip_value),
                pip_decimal: None,
            },
            stop_loss: StopLossMethod::PipsDirect { pips },
        }
    }

    fn price_input(symbol: &str, entry: Option<f64>, sl: Option<f64>) -> CalculatorInput {
        CalculatorInput {
            capital: 1000.0,
            risk_percentage: 1.0,
            instrument: InstrumentChoice::Listed(symbol.to_string()),
            stop_loss: StopLossMethod::PriceBased {
                entry_price: entry,
                stop_loss_price: sl,
                trade_type: TradeType::Buy,
            },
        }
    }

    #[test]
    fn known_example_pips_direct() {
        let r = compute_position(&pips_input(1000.0, 1.0, Some(20.0), 10.0)).unwrap();
        assert!((r.amount_risked - 10.0).abs() < 1e-9);
        assert!((r.lot_size - 0.05).abs() < 1e-9);
        assert!((r.pip_value - 10.0).abs() < 1e-9);
        assert!((r.pips - 20.0).abs() < 1e-9);
    }

    #[test]
    fn lot_size_matches_formula() {
        let cases = [
            (2500.0, 0.5, 15.0, 8.5),
            (10_000.0, 2.0, 37.5, 10.0),
            (750.0, 1.25, 4.0, 1.0),
        ];
        for (capital, risk, pips, pv) in cases {
            let r = compute_position(&pips_input(capital, risk, Some(pips), pv)).unwrap();
            let expected = (capital * risk / 100.0) / (pips * pv);
            assert!((r.lot_size - expected).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn price_based_eurusd_derives_twenty_pips() {
        let r = compute_position(&price_input("EURUSD", Some(1.1050), Some(1.1030))).unwrap();
        assert!((r.pips - 20.0).abs() < 1e-9);
        assert!((r.lot_size - 0.05).abs() < 1e-9);
    }

    #[test]
    fn price_based_is_direction_agnostic() {
        let long = compute_position(&price_input("USDJPY", Some(150.25), Some(150.00))).unwrap();
        let short = compute_position(&price_input("USDJPY", Some(150.00), Some(150.25))).unwrap();
        assert_eq!(long, short);
        assert!((long.pips - 25.0).abs() < 1e-9);
    }

    #[test]
    fn custom_instrument_defaults_pip_decimal() {
        let input = CalculatorInput {
            capital: 1000.0,
            risk_percentage: 1.0,
            instrument: InstrumentChoice::Custom {
                pip_value: Some(5.0),
                pip_decimal: None,
            },
            stop_loss: StopLossMethod::PriceBased {
                entry_price: Some(1.2000),
                stop_loss_price: Some(1.1990),
                trade_type: TradeType::Sell,
            },
        };
        let r = compute_position(&input).unwrap();
        assert!((r.pips - 10.0).abs() < 1e-9);
        assert!((r.lot_size - 0.2).abs() < 1e-9);
    }

    #[test]
    fn rejects_missing_or_non_positive_fields() {
        let bad = [
            pips_input(0.0, 1.0, Some(20.0), 10.0),
            pips_input(-5.0, 1.0, Some(20.0), 10.0),
            pips_input(1000.0, 0.0, Some(20.0), 10.0),
            pips_input(1000.0, 1.0, None, 10.0),
            pips_input(1000.0, 1.0, Some(0.0), 10.0),
            pips_input(f64::NAN, 1.0, Some(20.0), 10.0),
            pips_input(1000.0, 1.0, Some(20.0), 0.0),
            price_input("EURUSD", None, Some(1.1)),
            price_input("EURUSD", Some(1.1), Some(1.1)),
            price_input("NOPE", Some(1.1), Some(1.0)),
        ];
        for input in &bad {
            assert!(
                matches!(compute_position(input), Err(SizingError::InvalidInput(_))),
                "expected InvalidInput for {:?}",
                input
            );
        }
    }

    #[test]
    fn failed_calculation_keeps_previous_result() {
        let mut calc = PositionCalculator::new();
        let first = calc
            .calculate(&pips_input(1000.0, 1.0, Some(20.0), 10.0))
            .unwrap()
            .clone();
        assert!(calc.calculate(&pips_input(1000.0, 1.0, None, 10.0)).is_err());
        assert_eq!(calc.last_result(), Some(&first));
    }
}
