pub mod bitfloor;
pub mod mtgox;
