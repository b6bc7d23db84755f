//! CLI library components for the field matcher.

pub mod cli;
pub mod logging;
pub mod workflow;
