//! Route tables

pub mod admin;
pub mod directory;
pub mod metrics;
pub mod stats;
