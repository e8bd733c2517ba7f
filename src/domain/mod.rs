//! Domain objects for data-quality measures
//!
//! Provides the measure record and the parsing rules applied to its identifiers.

pub mod measure;
