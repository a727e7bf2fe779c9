//! Start, stop and restart through the rc.d script

use rcsvc::{RunComService, Service};

use super::CommandResult;

pub fn start(service: &RunComService) -> CommandResult {
    service.start()?;
    println!("● {} - started", service);
    Ok(())
}

pub fn stop(service: &RunComService) -> CommandResult {
    service.stop()?;
    println!("● {} - stopped", service);
    Ok(())
}

pub fn restart(service: &RunComService) -> CommandResult {
    service.restart()?;
    println!("● {} - restarted", service);
    Ok(())
}
