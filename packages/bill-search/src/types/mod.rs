//! Data types for one search run.

pub mod candidate;
pub mod config;
pub mod document;
pub mod result;
