//! bizdash: a client for a small business finance backend.
//!
//! The `Store` holds the products and transactions fetched from the backend of record and is the
//! only way to change them. The `views` module derives the dashboard, receivables, payables,
//! reports and inventory screens from a snapshot of the store.

pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod export;
pub mod model;
pub mod store;
mod utils;
pub mod views;

#[cfg(test)]
mod test;

pub use api::{Backend, Mode};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use store::Store;
