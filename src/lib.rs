pub mod cli;
pub mod config;
pub mod error;
pub mod jvm;
pub mod logging;
pub mod metrics;
pub mod report;
