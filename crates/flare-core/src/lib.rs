pub mod analysis;
pub mod classify;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod frame;
pub mod generate;
pub mod io;
pub mod metrics;
pub mod presets;
pub mod report;
pub mod thresholds;
