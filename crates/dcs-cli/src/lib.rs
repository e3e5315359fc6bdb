//! CLI library components for Data Cleaning Studio.

pub mod logging;
pub mod pipeline;
