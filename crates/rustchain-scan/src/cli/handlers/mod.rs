//! Command handlers for the scan CLI

pub mod config;
pub mod scan;
