pub mod config;
pub mod deals;
pub mod logging;
pub mod runner;
