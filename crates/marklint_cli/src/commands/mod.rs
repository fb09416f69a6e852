//! Subcommand implementations

mod check;
mod init;
mod rules;

pub use check::run_check;
pub use init::run_init;
pub use rules::run_rules;
