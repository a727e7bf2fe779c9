//! Run in the foreground until SIGTERM/SIGINT
//!
//! This is what the installed rc.d script launches.

use rcsvc::service::CallbackError;
use rcsvc::{Interface, RunComService, Service};

use super::CommandResult;

/// Program callbacks of the foreground service process
pub struct Program;

impl Interface for Program {
    fn start(&self, service: &dyn Service) -> Result<(), CallbackError> {
        let logger = service.logger()?;
        logger.info_fmt(format_args!(
            "{} started on {} (pid {})",
            service,
            service.platform(),
            std::process::id()
        ))?;
        Ok(())
    }

    fn stop(&self, service: &dyn Service) -> Result<(), CallbackError> {
        service.logger()?.info_fmt(format_args!("{} stopped", service))?;
        Ok(())
    }
}

pub fn run(service: &RunComService) -> CommandResult {
    service.run()?;
    Ok(())
}
