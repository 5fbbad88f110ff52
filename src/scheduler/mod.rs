//! Fixed-cadence poll scheduler

mod config;
mod core;

pub use config::SchedulerConfig;
pub use core::PollScheduler;
