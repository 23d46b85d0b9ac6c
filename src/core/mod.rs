pub mod config;
pub mod errors;
pub mod kernel;
pub mod numeric;
pub mod traits;
pub mod types;
