mod control;
mod disable;
mod install;
mod run;
mod status;
mod uninstall;

pub use control::{restart, start, stop};
pub use disable::disable;
pub use install::install;
pub use run::{run, Program};
pub use status::status;
pub use uninstall::uninstall;

/// Result type shared by all subcommands
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
