pub mod exchange_factory;

pub use exchange_factory::{BookFactory, BookSpec, Exchange, TraderFactory, TraderSpec};
