//! Remove the rc.d script
//!
//! The `pkg_scripts=` entry is left in place; use `disable` to drop it.

use rcsvc::{RunComService, Service};

use super::CommandResult;

pub fn uninstall(service: &RunComService) -> CommandResult {
    service.uninstall()?;

    println!("Removed {}", service.script_path()?.display());
    if service.startup_list().contains(&service.config().name)? {
        println!(
            "Note: {} is still listed in {}; run `disable` to remove it",
            service.config().name,
            service.startup_list().path().display()
        );
    }

    Ok(())
}
