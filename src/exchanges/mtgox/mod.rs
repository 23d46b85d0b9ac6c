pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{build_book, build_connector, MtgoxBuilder};
pub use connector::{Account, MarketData, MtgoxConnector, Trading};
pub use types::{MtgoxAmount, MtgoxDepth, MtgoxEnvelope, MtgoxInfo, MtgoxOrder, MtgoxWallet};
