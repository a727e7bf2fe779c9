//! Errors surfaced by service lifecycle actions

use std::path::PathBuf;

use crate::runcom::{CommandError, RcConfError, TemplateError, SYS_VERSION};
use crate::service::{CallbackError, Status};

/// A lifecycle action failure, annotated with the action and the service
#[derive(Debug, thiserror::Error)]
#[error("{} {} {} service: {}", .action, SYS_VERSION, .name, .kind)]
pub struct ServiceError {
    /// Action verb, e.g. "installing" or "getting status of"
    pub action: &'static str,
    /// Service name
    pub name: String,
    #[source]
    pub kind: ErrorKind,
}

impl ServiceError {
    pub fn new(action: &'static str, name: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            action,
            name: name.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Status to report alongside this failure
    ///
    /// A failed lifecycle call never tells anything about the daemon's state,
    /// so this is always [`Status::Unknown`].
    pub fn status(&self) -> Status {
        Status::Unknown
    }

    pub fn is_not_installed(&self) -> bool {
        matches!(self.kind, ErrorKind::NotInstalled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("user services are not supported on {}", SYS_VERSION)]
    UnsupportedConfiguration,

    #[error("script already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("the service is not installed")]
    NotInstalled,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("configuring system startup: {0}")]
    ConfigEdit(#[from] RcConfError),

    #[error("rendering rc.d script: {0}")]
    Template(#[from] TemplateError),

    #[error("service callback: {0}")]
    Callback(#[source] CallbackError),
}

impl ErrorKind {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Io { context, source }
    }
}
