//! Core domain types for the cash-flow report.
//!
//! Holds the transaction, month and summary models, the error taxonomy,
//! locale-tolerant amount and date parsers, display formatting and the
//! command-line settings shared by the other crates.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{CashFlowError, Result};
