pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{build_book, build_connector, BitfloorBuilder};
pub use connector::{Account, BitfloorConnector, MarketData, Trading};
pub use types::{BitfloorAccount, BitfloorBook, BitfloorOrder, BitfloorOrderAck};
