pub mod analysis;
pub mod config;
pub mod display;
pub mod pipeline;
pub mod schedule;
