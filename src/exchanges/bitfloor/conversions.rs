use super::types as bitfloor_types;
use crate::core::numeric::parse_decimal;
use crate::core::types::{Account, Order, OrderBook, PriceLevel, Side};
use serde_json::Value;

/// Bitfloor's wire encoding of a side is the canonical code itself
pub fn convert_side_to_bitfloor(side: Side) -> u8 {
    side.code()
}

/// Accepts `0`/`1` as JSON numbers or numeric strings
pub fn convert_bitfloor_side(raw: &Value) -> Result<Side, String> {
    let code = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match code {
        Some(0) => Ok(Side::Buy),
        Some(1) => Ok(Side::Sell),
        _ => Err(format!("unknown bitfloor side {}", raw)),
    }
}

pub fn convert_bitfloor_order(order: bitfloor_types::BitfloorOrder) -> Result<Order, String> {
    Ok(Order {
        side: convert_bitfloor_side(&order.side)?,
        id: order.order_id,
        product: order.product_id,
        size: order.size,
        price: order.price,
    })
}

pub fn convert_bitfloor_account(account: bitfloor_types::BitfloorAccount) -> Account {
    Account {
        currency: account.currency,
        amount: account.amount,
        hold: account.hold,
    }
}

fn convert_level(raw: &[Value]) -> Result<PriceLevel, String> {
    match raw {
        [price, size, ..] => Ok(PriceLevel {
            price: parse_decimal(price)?,
            size: parse_decimal(size)?,
        }),
        _ => Err(format!("book level needs price and size, got {} fields", raw.len())),
    }
}

pub fn convert_bitfloor_book(book: &bitfloor_types::BitfloorBook) -> Result<OrderBook, String> {
    Ok(OrderBook {
        bids: book
            .bids
            .iter()
            .map(|level| convert_level(level))
            .collect::<Result<_, _>>()?,
        asks: book
            .asks
            .iter()
            .map(|level| convert_level(level))
            .collect::<Result<_, _>>()?,
    })
}
