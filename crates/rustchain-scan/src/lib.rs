//! # RustChain Scan
//!
//! Weekly node host and miner scan for payout and upgrade outreach.
//!
//! The scan is a linear pipeline:
//! - discover node hosts from the seed node registry
//! - probe `/health`, `/epoch` and `/api/miners` on every node
//! - classify node hosts and miners into payout verdicts
//! - cross-reference observed miners against an expected list
//! - emit a JSON and a markdown report
//!
//! A node that cannot be reached is reported as such; it never fails the run.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod expected;
pub mod node_url;
pub mod output;
pub mod progress;
pub mod report;
pub mod scan;
pub mod types;

pub use cli::*;
pub use error::*;
