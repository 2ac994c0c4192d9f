pub mod account;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod graph;
pub mod transfer;
pub mod types;
