//! Service logger backed by the `log` facade
//!
//! Only error and info levels are used: warnings go out at info level,
//! prefixed with `warning: `.

use std::fmt;
use std::io;

use crate::service::Logger;

#[derive(Debug, Clone)]
pub struct SysLogger {
    name: String,
}

impl SysLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Logger for SysLogger {
    fn error(&self, msg: &str) -> io::Result<()> {
        log::error!(target: self.name.as_str(), "{}", msg);
        Ok(())
    }

    fn warning(&self, msg: &str) -> io::Result<()> {
        log::info!(target: self.name.as_str(), "warning: {}", msg);
        Ok(())
    }

    fn info(&self, msg: &str) -> io::Result<()> {
        log::info!(target: self.name.as_str(), "{}", msg);
        Ok(())
    }

    fn error_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::error!(target: self.name.as_str(), "{}", args);
        Ok(())
    }

    fn warning_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::info!(target: self.name.as_str(), "warning: {}", args);
        Ok(())
    }

    fn info_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        log::info!(target: self.name.as_str(), "{}", args);
        Ok(())
    }
}
