pub mod config;
pub mod error;
pub mod suppliers;
pub mod telemetry;
