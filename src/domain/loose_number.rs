use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

/// A numeric request field that clients may send either as a JSON number or as
/// a string holding one (`19.99` and `"19.99"` are both accepted).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum LooseNumber{
    Number(serde_json::Number),
    Text(String)
}

impl LooseNumber{
    pub fn to_decimal(&self, field: &str) -> Result<Decimal, String>{
        let parsed = match self {
            LooseNumber::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Some(Decimal::from(value))
                } else if let Some(value) = number.as_u64() {
                    Some(Decimal::from(value))
                } else {
                    number.as_f64()
                        .and_then(|value| Decimal::from_str(&value.to_string()).ok())
                }
            },
            LooseNumber::Text(text) => {
                let text = text.trim();
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .ok()
            }
        };

        parsed.ok_or_else(|| format!("{} must be a number", field))
    }

    // Integral floats such as `5.0` are accepted, fractions are not
    pub fn to_integer(&self, field: &str) -> Result<i32, String>{
        let parsed = match self {
            LooseNumber::Number(number) => {
                if let Some(value) = number.as_i64() {
                    i32::try_from(value).ok()
                } else {
                    number.as_f64()
                        .filter(|value| value.fract() == 0.0)
                        .filter(|value| *value >= i32::MIN as f64 && *value <= i32::MAX as f64)
                        .map(|value| value as i32)
                }
            },
            LooseNumber::Text(text) => text.trim().parse::<i32>().ok()
        };

        parsed.ok_or_else(|| format!("{} must be an integer", field))
    }
}
