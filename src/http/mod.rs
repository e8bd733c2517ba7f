//! HTTP transport layer for the measure resource
//!
//! Provides the handlers mounted under `/api/v1` plus the public health probe.

pub mod handlers;
