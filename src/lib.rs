pub mod core;
pub mod exchanges;
pub mod tracking;
pub mod utils;

pub use core::{
    errors::{ErrorReport, ExchangeError},
    traits::{AccountInfo, BookSource, OrderPlacer, Trader},
    types::*,
};
pub use exchanges::bitfloor::BitfloorConnector;
pub use exchanges::mtgox::MtgoxConnector;
pub use tracking::{BookEvent, FillTracker, L1BookTracker, OrderEvent, TrackerHandle};
pub use utils::{BookFactory, BookSpec, TraderFactory, TraderSpec};
