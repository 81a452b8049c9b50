//! CLI library components for rawload.

pub mod logging;
pub mod pipeline;
pub mod sink;
