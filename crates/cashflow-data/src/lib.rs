//! Data layer for the cash-flow report.
//!
//! Reads `;`-delimited statement exports, cleans them into transactions,
//! aggregates them by month and day, computes KPIs and runs the top-level
//! analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod kpi;
pub mod reader;

pub use cashflow_core as core;
