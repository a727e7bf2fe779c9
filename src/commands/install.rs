//! Install the rc.d script and enable it at boot

use rcsvc::{RunComService, Service};

use super::CommandResult;

pub fn install(service: &RunComService) -> CommandResult {
    service.install()?;

    let script = service.script_path()?;
    println!("Installed {}", script.display());
    println!(
        "Enabled at boot via {}",
        service.startup_list().path().display()
    );

    Ok(())
}
