//! Leveled logger interface handed to service programs

use std::fmt;
use std::io;

/// Three severities, each in a plain and a formatted flavour
pub trait Logger {
    fn error(&self, msg: &str) -> io::Result<()>;
    fn warning(&self, msg: &str) -> io::Result<()>;
    fn info(&self, msg: &str) -> io::Result<()>;
    fn error_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()>;
    fn warning_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()>;
    fn info_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()>;
}

/// Forwards to the `log` facade, for interactive runs
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn error(&self, msg: &str) -> io::Result<()> {
        log::error!("{}", msg);
        Ok(())
    }

    fn warning(&self, msg: &str) -> io::Result<()> {
        log::warn!("{}", msg);
        Ok(())
    }

    fn info(&self, msg: &str) -> io::Result<()> {
        log::info!("{}", msg);
        Ok(())
    }

    fn error_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::error!("{}", args);
        Ok(())
    }

    fn warning_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::warn!("{}", args);
        Ok(())
    }

    fn info_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::info!("{}", args);
        Ok(())
    }
}
