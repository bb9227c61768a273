pub mod assistant;
pub mod banner;
pub mod bridge;
pub mod commands;
pub mod consts;
pub mod error;
pub mod progress;
pub mod report;
pub mod session;
pub mod workflow;
