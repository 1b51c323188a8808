//! CLI command implementations.

pub mod check;
pub mod common;
pub mod output;
pub mod query;
pub mod show;
