use super::types as mtgox_types;
use crate::core::errors::ExchangeError;
use crate::core::numeric::{parse_decimal, parse_scaled, to_scaled};
use crate::core::types::{Account, Order, OrderBook, PriceLevel, Side};
use rust_decimal::Decimal;
use serde_json::Value;

/// BTC amounts travel as satoshi-like integers
pub const AMOUNT_SCALE: u32 = 8;
/// Prices travel as integers at 10^5
pub const PRICE_SCALE: u32 = 5;

pub fn convert_side_to_mtgox(side: Side) -> &'static str {
    match side {
        Side::Buy => "bid",
        Side::Sell => "ask",
    }
}

pub fn convert_mtgox_side(raw: &str) -> Result<Side, String> {
    match raw {
        "bid" => Ok(Side::Buy),
        "ask" => Ok(Side::Sell),
        other => Err(format!("unknown mtgox order type {:?}", other)),
    }
}

pub fn amount_to_int(size: Decimal) -> Result<String, ExchangeError> {
    to_scaled(size, AMOUNT_SCALE).map(|units| units.to_string())
}

pub fn price_to_int(price: Decimal) -> Result<String, ExchangeError> {
    to_scaled(price, PRICE_SCALE).map(|units| units.to_string())
}

/// Integer scale mtgox uses for a wallet currency
pub fn currency_scale(currency: &str) -> u32 {
    match currency {
        "BTC" => AMOUNT_SCALE,
        "JPY" | "SEK" => 3,
        _ => PRICE_SCALE,
    }
}

/// `value_int` is exact and wins; `value` is the fallback
pub fn convert_mtgox_amount(
    amount: &mtgox_types::MtgoxAmount,
    scale: u32,
) -> Result<Decimal, String> {
    if let Some(units) = &amount.value_int {
        return parse_scaled(units, scale);
    }
    match &amount.value {
        Some(value) => parse_decimal(value),
        None => Err("amount has neither value_int nor value".to_string()),
    }
}

pub fn convert_mtgox_order(order: mtgox_types::MtgoxOrder) -> Result<Order, String> {
    let product = match (&order.item, &order.currency) {
        (Some(item), Some(currency)) => format!("{}{}", item, currency),
        _ => String::new(),
    };

    Ok(Order {
        side: convert_mtgox_side(&order.order_type)?,
        size: convert_mtgox_amount(&order.amount, AMOUNT_SCALE)?,
        price: convert_mtgox_amount(&order.price, PRICE_SCALE)?,
        id: order.oid,
        product,
    })
}

pub fn convert_mtgox_wallet(
    currency: &str,
    wallet: &mtgox_types::MtgoxWallet,
) -> Result<Account, String> {
    let scale = currency_scale(currency);
    let hold = match &wallet.open_orders {
        Some(open) => convert_mtgox_amount(open, scale)?,
        None => Decimal::ZERO,
    };

    Ok(Account {
        currency: currency.to_string(),
        amount: convert_mtgox_amount(&wallet.balance, scale)?,
        hold,
    })
}

fn convert_level(raw: &Value) -> Result<PriceLevel, String> {
    match raw {
        Value::Array(fields) if fields.len() >= 2 => Ok(PriceLevel {
            price: parse_decimal(&fields[0])?,
            size: parse_decimal(&fields[1])?,
        }),
        Value::Object(fields) => {
            let price = fields.get("price").ok_or("depth level without price")?;
            let size = fields.get("amount").ok_or("depth level without amount")?;
            Ok(PriceLevel {
                price: parse_decimal(price)?,
                size: parse_decimal(size)?,
            })
        }
        other => Err(format!("unrecognised depth level {}", other)),
    }
}

pub fn convert_mtgox_depth(depth: &mtgox_types::MtgoxDepth) -> Result<OrderBook, String> {
    Ok(OrderBook {
        bids: depth.bids.iter().map(convert_level).collect::<Result<_, _>>()?,
        asks: depth.asks.iter().map(convert_level).collect::<Result<_, _>>()?,
    })
}
