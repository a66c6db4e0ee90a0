//! CLI subcommand implementations.

pub mod count;
pub mod create;
pub mod get;
pub mod search;
pub mod update;
