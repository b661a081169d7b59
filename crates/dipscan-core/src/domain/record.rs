use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// One row of the full screening dataset.
///
/// Built only once all three gateway values for the symbol are present,
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: Symbol,
    /// Trailing moving average, rounded to 3 decimal places by the gateway.
    pub moving_average: f64,
    /// Latest close price, rounded to 2 decimal places by the gateway.
    pub price: f64,
    /// Absolute deviation: `price - moving_average`.
    pub change: f64,
    /// Relative deviation in percent; defined as 0 when the average is
    /// exactly 0.
    pub percent_change: f64,
}

impl PriceRecord {
    pub fn new(symbol: Symbol, price: f64, moving_average: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("moving_average", moving_average)?;

        let change = price - moving_average;
        let percent_change = if moving_average == 0.0 {
            0.0
        } else {
            (change / moving_average) * 100.0
        };

        Ok(Self {
            symbol,
            moving_average,
            price,
            change,
            percent_change,
        })
    }

    /// Projection carried into the ranked table, present only when the
    /// instrument trades below its average.
    pub fn underperformer(&self) -> Option<UnderperformerRecord> {
        if self.percent_change < 0.0 {
            Some(UnderperformerRecord {
                symbol: self.symbol.clone(),
                price: self.price,
                percent_change: self.percent_change,
            })
        } else {
            None
        }
    }
}

/// Underperformer projection of a [`PriceRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderperformerRecord {
    pub symbol: Symbol,
    pub price: f64,
    pub percent_change: f64,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
