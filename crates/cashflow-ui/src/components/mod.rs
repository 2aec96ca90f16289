pub mod header;
pub mod metrics;
