//! rcsvc - Service lifecycle controller for RunCom init systems
//!
//! Installs a daemon as an rc.d service and drives it afterwards:
//! - Renders and writes the `/etc/rc.d/<name>` launch script
//! - Registers the service in `pkg_scripts=` of `/etc/rc.conf.local`
//! - Starts, stops and checks the service through its script
//! - Blocks a foreground daemon until SIGTERM/SIGINT arrives
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                RunComService                     │
//! ├─────────────────────────────────────────────────┤
//! │ Script │ Startup list │ Status check │ Run wait │
//! ├─────────────────────────────────────────────────┤
//! │        filesystem  ·  CommandRunner  ·  log      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod runcom;
pub mod service;

pub use error::{ErrorKind, ServiceError};
pub use runcom::{Layout, RunComService, RunComSystem};
pub use service::{Config, Interface, Logger, OptionValue, Options, Service, Status, System};
