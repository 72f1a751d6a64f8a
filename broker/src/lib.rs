pub mod capacity;
pub mod config;
pub mod engine;
pub mod error;
pub mod funds;
pub mod market;
pub mod orderbook;
pub mod rpc;
