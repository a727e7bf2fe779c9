//! RunCom (OpenBSD rc.d) service implementation
//!
//! A service is an rc.d script at `<script_dir>/<name>` built on rc.subr,
//! plus an entry in the `pkg_scripts=` line of rc.conf.local so that the
//! system starts it at boot. Start, stop and status go through the script.

mod exec;
mod rc_conf;
pub mod script;
mod status;
mod syslog;
pub mod wait;

pub use exec::{CommandError, CommandOutput, CommandRunner, ExitCode, ProcessRunner};
pub use rc_conf::{RcConfError, StartupList, PKG_SCRIPTS_PREFIX, RC_CONF_LOCAL};
pub use script::{ScriptContext, TemplateError, DEFAULT_TEMPLATE};
pub use status::translate;
pub use syslog::SysLogger;
pub use wait::{run_wait, TerminationSignal};

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::PathBuf;

use crate::error::{ErrorKind, ServiceError};
use crate::service::{Config, ConsoleLogger, Interface, Logger, Service, Status, System};

/// Version identifier of this service implementation
pub const SYS_VERSION: &str = "openbsd-runcom";

/// Platform reported by [`RunComService`]
pub const PLATFORM: &str = "openbsd";

/// Default directory of rc.d scripts
pub const SCRIPT_DIR: &str = "/etc/rc.d";

/// Option (bool): install as a per-user service; unsupported here
pub const OPTION_USER_SERVICE: &str = "UserService";
/// Option (string): script template replacing [`DEFAULT_TEMPLATE`]
pub const OPTION_RUN_COM_SCRIPT: &str = "RunComScript";
/// Option (string): identification written into the script header
pub const OPTION_SVC_INFO: &str = "SvcInfo";
/// Option (function): replaces [`run_wait`] in [`Service::run`]
pub const OPTION_RUN_WAIT: &str = "RunWait";

const SCRIPT_MODE: u32 = 0o755;

/// Filesystem locations used by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory holding rc.d scripts
    pub script_dir: PathBuf,
    /// Startup configuration with the `pkg_scripts=` line
    pub rc_conf: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            script_dir: PathBuf::from(SCRIPT_DIR),
            rc_conf: PathBuf::from(RC_CONF_LOCAL),
        }
    }
}

/// The RunCom init system
#[derive(Debug, Default, Clone, Copy)]
pub struct RunComSystem;

impl fmt::Display for RunComSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SYS_VERSION)
    }
}

impl System for RunComSystem {
    fn detect(&self) -> bool {
        true
    }

    fn interactive(&self) -> bool {
        nix::unistd::getppid().as_raw() != 1
    }

    fn new_service(
        &self,
        interface: Box<dyn Interface>,
        config: Config,
    ) -> Result<Box<dyn Service>, ServiceError> {
        Ok(Box::new(RunComService::new(interface, config)))
    }
}

/// One program controlled through an rc.d script
pub struct RunComService<R = ProcessRunner> {
    interface: Box<dyn Interface>,
    config: Config,
    layout: Layout,
    runner: R,
}

impl RunComService<ProcessRunner> {
    pub fn new(interface: Box<dyn Interface>, config: Config) -> Self {
        Self {
            interface,
            config,
            layout: Layout::default(),
            runner: ProcessRunner,
        }
    }
}

impl<R: CommandRunner> RunComService<R> {
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the runner used to invoke the rc.d script
    pub fn with_runner<T: CommandRunner>(self, runner: T) -> RunComService<T> {
        RunComService {
            interface: self.interface,
            config: self.config,
            layout: self.layout,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn startup_list(&self) -> StartupList {
        StartupList::new(&self.layout.rc_conf)
    }

    /// Absolute path of the rc.d script
    pub fn script_path(&self) -> Result<PathBuf, ErrorKind> {
        if self.config.options.get_bool(OPTION_USER_SERVICE, false) {
            return Err(ErrorKind::UnsupportedConfiguration);
        }

        Ok(self.layout.script_dir.join(&self.config.name))
    }

    /// Absolute path of the executable to run as a service
    fn exec_path(&self) -> Result<PathBuf, ErrorKind> {
        let path = match &self.config.executable {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => std::env::current_exe().map_err(ErrorKind::io("locating current executable"))?,
        };

        std::path::absolute(&path).map_err(ErrorKind::io("resolving executable path"))
    }

    /// Render the script text from the configured template
    pub fn render_script(&self) -> Result<String, ErrorKind> {
        let exec_path = self.exec_path()?;
        let template = self
            .config
            .options
            .get_string(OPTION_RUN_COM_SCRIPT, DEFAULT_TEMPLATE);

        let ctx = ScriptContext {
            name: &self.config.name,
            display_name: self.config.display(),
            description: self.config.description.as_deref().unwrap_or_default(),
            path: &exec_path,
            arguments: &self.config.arguments,
            svc_info: self
                .config
                .options
                .get_string(OPTION_SVC_INFO, self.config.display()),
        };

        Ok(script::render(template, &ctx)?)
    }

    fn write_script(&self) -> Result<PathBuf, ErrorKind> {
        let path = self.script_path()?;

        match fs::symlink_metadata(&path) {
            Ok(_) => return Err(ErrorKind::AlreadyExists(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ErrorKind::io("checking rc.d script")(e)),
        }

        let content = self.render_script()?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(SCRIPT_MODE)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.clone()),
                _ => ErrorKind::io("creating rc.d script file")(e),
            })?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(ErrorKind::io("writing rc.d script file"))?;

        fs::set_permissions(&path, fs::Permissions::from_mode(SCRIPT_MODE))
            .map_err(ErrorKind::io("changing rc.d script file permissions"))?;

        Ok(path)
    }

    /// Invoke the rc.d script with a single rc_cmd argument
    fn run_com(&self, cmd: &str) -> Result<CommandOutput, ErrorKind> {
        let path = self.script_path()?;
        Ok(self.runner.run(&path, &[cmd])?)
    }

    /// Invoke the script and fail on a non-zero exit
    fn control(&self, cmd: &str) -> Result<(), ErrorKind> {
        let out = self.run_com(cmd)?;
        if out.success() {
            return Ok(());
        }

        let path = self.script_path()?;
        Err(CommandError::Failed {
            program: path,
            arg: cmd.to_string(),
            code: ExitCode(out.code),
            stderr: if out.stderr.trim().is_empty() {
                out.stdout
            } else {
                out.stderr
            },
        }
        .into())
    }

    fn annotate(&self, action: &'static str) -> impl FnOnce(ErrorKind) -> ServiceError + '_ {
        move |kind| ServiceError::new(action, &self.config.name, kind)
    }
}

impl<R> fmt::Display for RunComService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config.display())
    }
}

impl<R: CommandRunner> Service for RunComService<R> {
    fn install(&self) -> Result<(), ServiceError> {
        let annotate = self.annotate("installing");

        let path = self.write_script().map_err(annotate)?;
        log::debug!("wrote {}", path.display());

        self.startup_list()
            .add(&self.config.name)
            .map_err(|e| self.annotate("installing")(e.into()))?;

        log::info!("installed {} service {}", SYS_VERSION, self.config.name);
        Ok(())
    }

    fn uninstall(&self) -> Result<(), ServiceError> {
        let annotate = self.annotate("uninstalling");

        let path = self.script_path().map_err(annotate)?;
        fs::remove_file(&path)
            .map_err(|e| self.annotate("uninstalling")(ErrorKind::io("removing rc.d script")(e)))?;

        // The pkg_scripts= entry is left for `disable` to remove.
        log::info!("uninstalled {} service {}", SYS_VERSION, self.config.name);
        Ok(())
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.control("start").map_err(self.annotate("starting"))
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.control("stop").map_err(self.annotate("stopping"))
    }

    fn restart(&self) -> Result<(), ServiceError> {
        self.stop()?;
        self.start()
    }

    fn run(&self) -> Result<(), ServiceError> {
        self.interface
            .start(self)
            .map_err(|e| self.annotate("running")(ErrorKind::Callback(e)))?;

        let wait = self.config.options.get_func(OPTION_RUN_WAIT, run_wait);
        wait();

        self.interface
            .stop(self)
            .map_err(|e| self.annotate("running")(ErrorKind::Callback(e)))
    }

    fn status(&self) -> Result<Status, ServiceError> {
        let out = self.run_com("check").map_err(self.annotate("getting status of"))?;
        translate(&out.stdout, &self.config.name).map_err(self.annotate("getting status of"))
    }

    fn logger(&self) -> Result<Box<dyn Logger>, ServiceError> {
        if RunComSystem.interactive() {
            return Ok(Box::new(ConsoleLogger));
        }

        self.system_logger()
    }

    fn system_logger(&self) -> Result<Box<dyn Logger>, ServiceError> {
        Ok(Box::new(SysLogger::new(&self.config.name)))
    }

    fn platform(&self) -> &'static str {
        PLATFORM
    }
}
