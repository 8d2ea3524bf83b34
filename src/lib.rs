pub mod config;
pub mod dataset;
pub mod export;
pub mod metrics;
pub mod persist;
pub mod rankings;
pub mod state;
