//! CLI module for argument parsing and command handling

pub mod args;
pub mod commands;
pub mod handlers;

pub use args::*;
pub use commands::*;
