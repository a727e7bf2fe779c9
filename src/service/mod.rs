//! Generic service framework contract
//!
//! A [`System`] builds a [`Service`] from a [`Config`] and the daemon's own
//! [`Interface`] callbacks. The service then exposes the lifecycle actions
//! an init system integration has to provide.

mod config;
mod logger;
mod options;

pub use config::Config;
pub use logger::{ConsoleLogger, Logger};
pub use options::{OptionValue, Options, WaitFn};

use std::fmt;

use crate::error::ServiceError;

/// Error returned by the daemon's start/stop callbacks
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Observed state of an installed service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Unknown,
    Running,
    Stopped,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Running => "running",
            Status::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callbacks of the program being run as a service
pub trait Interface {
    /// Start the program; must not block
    fn start(&self, service: &dyn Service) -> Result<(), CallbackError>;

    /// Stop the program; must not block for long
    fn stop(&self, service: &dyn Service) -> Result<(), CallbackError>;
}

/// Lifecycle actions of one service on one init system
///
/// `Display` gives the human-readable service name.
pub trait Service: fmt::Display {
    /// Register the service with the init system
    fn install(&self) -> Result<(), ServiceError>;

    /// Remove the service from the init system
    fn uninstall(&self) -> Result<(), ServiceError>;

    /// Ask the init system to start the installed service
    fn start(&self) -> Result<(), ServiceError>;

    /// Ask the init system to stop the installed service
    fn stop(&self) -> Result<(), ServiceError>;

    /// Stop, then start; stops at the first failure
    fn restart(&self) -> Result<(), ServiceError>;

    /// Run the program in the current process until asked to terminate
    fn run(&self) -> Result<(), ServiceError>;

    /// Query the init system for the service state
    fn status(&self) -> Result<Status, ServiceError>;

    /// Logger suited to the current execution context
    fn logger(&self) -> Result<Box<dyn Logger>, ServiceError>;

    /// Logger routed to the init system's logging facility
    fn system_logger(&self) -> Result<Box<dyn Logger>, ServiceError>;

    /// Target platform identifier
    fn platform(&self) -> &'static str;
}

/// An init system able to host services
///
/// `Display` gives the implementation's version identifier.
pub trait System: fmt::Display {
    /// Whether this system is usable on the running host
    fn detect(&self) -> bool;

    /// Whether the process runs from a terminal rather than under init
    fn interactive(&self) -> bool;

    /// Build a service for the given program
    fn new_service(
        &self,
        interface: Box<dyn Interface>,
        config: Config,
    ) -> Result<Box<dyn Service>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(Status::Unknown.as_str(), "unknown");
        assert_eq!(Status::Running.as_str(), "running");
        assert_eq!(Status::Stopped.as_str(), "stopped");
        assert_eq!(Status::default(), Status::Unknown);
        assert_eq!(Status::Running.to_string(), "running");
    }
}
