//! Terminal UI layer for the cash-flow report.
//!
//! Provides themes, the header and KPI components, the monthly and
//! transaction tables, the income/expense chart, a plain-text renderer and
//! the interactive application loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod plain;
pub mod table_view;
pub mod themes;

pub use cashflow_core as core;
