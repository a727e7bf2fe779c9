//! Remove the service from pkg_scripts= without touching the script

use rcsvc::RunComService;

use super::CommandResult;

pub fn disable(service: &RunComService) -> CommandResult {
    let list = service.startup_list();
    let name = &service.config().name;

    if list.remove(name)? {
        println!("Removed {} from {}", name, list.path().display());
    } else {
        println!("{} is not listed in {}", name, list.path().display());
    }

    Ok(())
}
