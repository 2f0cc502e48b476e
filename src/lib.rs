//! Typing log analyzer - batch analytics for hold-to-remap typing logs
//!
//! Loads the JSON Lines log written by the remapping tool and reports
//! mistake rates, timing distributions, problem keys, key sequences and
//! time-of-day patterns, plus two PNG charts.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod events;
pub mod pipeline;
pub mod plots;
pub mod report;
pub mod utils;

pub use config::Config;
pub use events::{Dataset, TypingEvent};
