//! Show service status

use rcsvc::{RunComService, Service, Status};

use super::CommandResult;

pub fn status(service: &RunComService) -> CommandResult {
    let name = &service.config().name;

    let (status, state, error) = match service.status() {
        Ok(status) => (status, status.as_str(), None),
        Err(e) if e.is_not_installed() => (e.status(), "not installed", None),
        Err(e) => (e.status(), e.status().as_str(), Some(e)),
    };

    let status_symbol = match status {
        Status::Running => "●",
        Status::Stopped => "○",
        Status::Unknown => "×",
    };

    let enabled = service.startup_list().contains(name)?;

    println!("{} {} - {}", status_symbol, name, service);
    println!("     Script: {}", service.script_path()?.display());
    println!("     Active: {}", state);
    println!(
        "    Enabled: {}",
        if enabled { "yes (pkg_scripts)" } else { "no" }
    );
    if let Some(e) = error {
        println!("      Error: {}", e);
    }

    Ok(())
}
