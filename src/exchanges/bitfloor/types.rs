use crate::core::numeric::deserialize_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Bitfloor hands out ids as either JSON strings or integers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, got {}",
            other
        ))),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, got {}",
            other
        ))),
    }
}

/// Acknowledgement of `/order/new` and `/order/cancel`
#[derive(Debug, Deserialize, Clone)]
pub struct BitfloorOrderAck {
    #[serde(deserialize_with = "deserialize_id")]
    pub order_id: String,
}

/// Order as listed by `/orders` and `/order/details`
#[derive(Debug, Deserialize, Clone)]
pub struct BitfloorOrder {
    #[serde(alias = "id", deserialize_with = "deserialize_id")]
    pub order_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub product_id: String,
    pub side: Value, // 0 = buy, 1 = sell; numeric or numeric string
    #[serde(deserialize_with = "deserialize_decimal")]
    pub size: Decimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,
}

/// Entry of `/accounts`
#[derive(Debug, Deserialize, Clone)]
pub struct BitfloorAccount {
    pub currency: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub hold: Decimal,
}

/// `GET /book/l2/{product}`; each level is `[price, size, ...]`
#[derive(Debug, Deserialize, Clone)]
pub struct BitfloorBook {
    pub bids: Vec<Vec<Value>>,
    pub asks: Vec<Vec<Value>>,
}
