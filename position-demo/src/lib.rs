pub mod config;
pub mod logging;
pub mod metadata;
pub mod workflow;
