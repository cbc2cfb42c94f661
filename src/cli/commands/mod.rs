//! Command implementations, one module per subcommand

pub mod classify;
pub mod completions;
pub mod inventory;
pub mod merge;
pub mod value;
