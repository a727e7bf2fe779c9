mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rcsvc::runcom::{
    OPTION_RUN_COM_SCRIPT, OPTION_SVC_INFO, OPTION_USER_SERVICE, RC_CONF_LOCAL, SCRIPT_DIR,
};
use rcsvc::{Config, Layout, Options, RunComService};

#[derive(Parser)]
#[command(name = "rcsvc")]
#[command(about = "Install and control a daemon as an rc.d service")]
struct Args {
    /// Service name, also the rc.d script name
    #[arg(long, short = 'n', global = true, default_value = "rcsvc")]
    name: String,

    /// Human-readable service name
    #[arg(long, global = true)]
    display_name: Option<String>,

    /// Executable to launch (defaults to this binary)
    #[arg(long = "exec", global = true)]
    executable: Option<PathBuf>,

    /// Custom rc.d script template file
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Identification written into the script header
    #[arg(long, global = true)]
    svc_info: Option<String>,

    /// Request a per-user service (not supported by rc.d)
    #[arg(long, global = true)]
    user: bool,

    /// Directory holding rc.d scripts
    #[arg(long, global = true, default_value = SCRIPT_DIR)]
    script_dir: PathBuf,

    /// Startup configuration holding pkg_scripts=
    #[arg(long, global = true, default_value = RC_CONF_LOCAL)]
    rc_conf: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the rc.d script and enable it at boot
    Install {
        /// Arguments passed to the executable by the script
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Remove the rc.d script
    Uninstall,

    /// Start the service through its rc.d script
    Start,

    /// Stop the service through its rc.d script
    Stop,

    /// Stop, then start the service
    Restart,

    /// Show service status
    Status,

    /// Run in the foreground until SIGTERM or SIGINT
    Run,

    /// Remove the service from pkg_scripts=
    Disable,
}

fn build_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut options = Options::new().with(OPTION_USER_SERVICE, args.user);

    if let Some(path) = &args.template {
        let template = std::fs::read_to_string(path)
            .map_err(|e| format!("reading template {}: {}", path.display(), e))?;
        options.set(OPTION_RUN_COM_SCRIPT, template);
    }
    if let Some(info) = &args.svc_info {
        options.set(OPTION_SVC_INFO, info.as_str());
    }

    let mut config = Config::new(&args.name).with_options(options);
    config.display_name = args.display_name.clone();
    config.executable = args.executable.clone();
    if let Command::Install { args: extra } = &args.command {
        config.arguments = if extra.is_empty() && args.executable.is_none() {
            // The script relaunches this binary in the foreground
            vec!["--name".to_string(), args.name.clone(), "run".to_string()]
        } else {
            extra.clone()
        };
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = build_config(&args)?;
    let service = RunComService::new(Box::new(commands::Program), config).with_layout(Layout {
        script_dir: args.script_dir.clone(),
        rc_conf: args.rc_conf.clone(),
    });

    match args.command {
        Command::Install { .. } => commands::install(&service)?,
        Command::Uninstall => commands::uninstall(&service)?,
        Command::Start => commands::start(&service)?,
        Command::Stop => commands::stop(&service)?,
        Command::Restart => commands::restart(&service)?,
        Command::Status => commands::status(&service)?,
        Command::Run => commands::run(&service)?,
        Command::Disable => commands::disable(&service)?,
    }

    Ok(())
}
