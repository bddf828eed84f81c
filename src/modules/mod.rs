//! Modules layer - Components that are not tied to a single feature
//!
//! Contains the text classifier used to categorize reports.

pub mod classifier;
