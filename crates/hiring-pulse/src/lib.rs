pub mod config;
pub mod dashboard;
pub mod error;
pub mod sources;
pub mod telemetry;
