use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Every private mtgox call answers `{"result": ..., "return": ...}` or
/// `{"error": ...}`
#[derive(Debug, Deserialize, Clone)]
pub struct MtgoxEnvelope {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(rename = "return", default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// A monetary amount; `value_int` is the scaled integer, `value` the display form
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MtgoxAmount {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub value_int: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MtgoxOrder {
    pub oid: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub amount: MtgoxAmount,
    pub price: MtgoxAmount,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MtgoxWallet {
    pub balance: MtgoxAmount,
    #[serde(rename = "Open_Orders", default)]
    pub open_orders: Option<MtgoxAmount>,
}

/// `return` of `/api/1/generic/private/info`
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MtgoxInfo {
    #[serde(default)]
    pub wallets: HashMap<String, MtgoxWallet>,
}

/// `getDepth.php`; levels are `[price, amount]` pairs or `{price, amount}` objects
#[derive(Debug, Deserialize, Clone)]
pub struct MtgoxDepth {
    pub bids: Vec<Value>,
    pub asks: Vec<Value>,
}
