//! Service descriptor

use std::path::PathBuf;

use super::Options;

/// Description of the program to install and control as a service
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Unique service name, also the rc.d script file name
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Executable to run; defaults to the current executable
    pub executable: Option<PathBuf>,
    /// Arguments passed to the executable
    pub arguments: Vec<String>,
    pub options: Options,
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Display name if set and non-empty, otherwise the name
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}
